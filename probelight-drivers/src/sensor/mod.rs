//! Temperature sensor drivers

#[cfg(test)]
mod fake;
pub mod guard;
pub mod register;
pub mod sampling;
pub mod tmp117;
pub mod verified;

pub use register::RegisterLink;
pub use sampling::RunningAverage;
pub use tmp117::{Tmp117, TEMPERATURE_LSB};
pub use verified::{join_serial, offset_from_raw, quantize_offset, split_serial, OFFSET_LSB, SERIAL_LIMIT};
