//! Configuration types
//!
//! Device profiles and timing policy are compile-time defaults that match the
//! supported parts. Board wiring comes from `board.toml`, parsed by
//! [`parse_board_config`].

pub mod board;
pub mod parse;
pub mod profile;

pub use board::*;
pub use parse::{parse_board_config, ParseError};
pub use profile::*;
