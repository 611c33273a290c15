//! Board configuration
//!
//! `board.toml` is compiled into the image. build.rs has already rejected
//! malformed files, so a parse failure here only happens if the parser and
//! the validator disagree; the defaults are used in that case.

use defmt::*;
use probelight_core::config::{parse_board_config, BoardConfig};

/// Embedded board configuration (edit board.toml and rebuild to customize)
const EMBEDDED_CONFIG: &str = include_str!("../../board.toml");

/// Load the embedded board configuration
pub fn load() -> BoardConfig {
    match parse_board_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Board config: sensor '{}' at {=u8:#x}, light '{}'",
                config.sensor.name.as_str(),
                config.sensor.address,
                config.light.name.as_str()
            );
            config
        }
        Err(e) => {
            warn!("board.toml rejected ({}), using defaults", e);
            BoardConfig::default()
        }
    }
}
