//! Board configuration parser
//!
//! A minimal line-oriented reader for `board.toml`. It handles only the
//! subset the board file uses and is not a general TOML parser.
//!
//! Supported features:
//! - `[sensor]`, `[light]` and `[startup]` section headers
//! - Key = value pairs (string, decimal or `0x` hex integer, `gpioNN` pin)
//! - Comments (# ...), including trailing comments
//!
//! Unknown keys are ignored so older firmware accepts newer board files.

use super::board::BoardConfig;
use crate::actor::bounded_name;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Pin is not of the form `gpioNN`
    InvalidPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Sensor,
    Light,
    Startup,
}

/// Parse a board file, starting from the default configuration
pub fn parse_board_config(input: &str) -> Result<BoardConfig, ParseError> {
    let mut config = BoardConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let header = line
        .strip_prefix('[')
        .and_then(|rest| rest.split('#').next())
        .map(str::trim)
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match header.trim() {
        "sensor" => Ok(Section::Sensor),
        "light" => Ok(Section::Light),
        "startup" => Ok(Section::Startup),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut BoardConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {}
        Section::Sensor => {
            let sensor = &mut config.sensor;
            match key {
                "name" => sensor.name = bounded_name(parse_string(value)?),
                "address" => {
                    let address: u8 = parse_int(value)?;
                    if address > 0x7F {
                        return Err(ParseError::InvalidValue);
                    }
                    sensor.address = address;
                }
                "i2c_frequency" => sensor.i2c_frequency = parse_int(value)?,
                "sda_pin" => sensor.sda_pin = parse_pin(value)?,
                "scl_pin" => sensor.scl_pin = parse_pin(value)?,
                _ => {}
            }
        }
        Section::Light => {
            let light = &mut config.light;
            match key {
                "name" => light.name = bounded_name(parse_string(value)?),
                "pin" => light.pin = parse_pin(value)?,
                "pwm_top" => {
                    let top: u16 = parse_int(value)?;
                    if top == 0 {
                        return Err(ParseError::InvalidValue);
                    }
                    light.pwm_top = top;
                }
                _ => {}
            }
        }
        Section::Startup => {
            let startup = &mut config.startup;
            match key {
                "pulse_count" => startup.pulse_count = parse_int(value)?,
                "sample_count" => startup.sample_count = parse_int(value)?,
                "sample_period_s" => startup.sample_period_s = parse_int(value)?,
                "error_blinks" => startup.error_blinks = parse_int(value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip surrounding quotes; bare words are accepted as-is
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else if value.contains('"') {
        Err(ParseError::InvalidValue)
    } else {
        Ok(value)
    }
}

/// Parse a decimal or `0x`-prefixed hex integer, allowing `_` separators
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    let mut raw: u32 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix).ok_or(ParseError::InvalidValue)?;
        raw = raw
            .checked_mul(radix)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ParseError::InvalidValue)?;
        seen_digit = true;
    }
    if !seen_digit {
        return Err(ParseError::InvalidValue);
    }

    T::try_from(raw).map_err(|_| ParseError::InvalidValue)
}

/// Parse a pin like `"gpio4"` or `gpio25`
fn parse_pin(value: &str) -> Result<u8, ParseError> {
    let value = parse_string(value)?;
    let number = value.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = number.parse().map_err(|_| ParseError::InvalidPin)?;
    if pin > 29 {
        return Err(ParseError::InvalidPin);
    }
    Ok(pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = r#"
# Probe board, RP2040
[sensor]
name = "Probe"
address = 0x48        # ADD0 tied to GND
i2c_frequency = 400_000
sda_pin = "gpio4"
scl_pin = "gpio5"

[light]
name = "Status LED"
pin = "gpio25"
pwm_top = 10000

[startup]
pulse_count = 2
sample_count = 5
sample_period_s = 60
error_blinks = 4
"#;

    #[test]
    fn test_parse_full_board() {
        let config = parse_board_config(BOARD).unwrap();

        assert_eq!(config.sensor.name.as_str(), "Probe");
        assert_eq!(config.sensor.address, 0x48);
        assert_eq!(config.sensor.i2c_frequency, 400_000);
        assert_eq!(config.sensor.sda_pin, 4);
        assert_eq!(config.sensor.scl_pin, 5);

        assert_eq!(config.light.name.as_str(), "Status LED");
        assert_eq!(config.light.pin, 25);
        assert_eq!(config.light.pwm_top, 10_000);

        assert_eq!(config.startup.pulse_count, 2);
        assert_eq!(config.startup.sample_count, 5);
        assert_eq!(config.startup.sample_period_s, 60);
        assert_eq!(config.startup.error_blinks, 4);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_board_config("").unwrap(), BoardConfig::default());
        assert_eq!(
            parse_board_config("# nothing here\n\n").unwrap(),
            BoardConfig::default()
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_board_config("[sensor]\ncolour = \"blue\"\naddress = 73\n").unwrap();
        assert_eq!(config.sensor.address, 73);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert_eq!(
            parse_board_config("[heater]\npin = \"gpio1\"\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(
            parse_board_config("[sensor\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_long_name_truncated() {
        let config = parse_board_config("[light]\nname = \"Front panel indicator\"\n").unwrap();
        assert_eq!(config.light.name.as_str(), "Front pane");
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("a = 1"), Some(("a", "1")));
        assert_eq!(parse_key_value("a = 1 # note"), Some(("a", "1")));
        assert_eq!(
            parse_key_value("name = \"#1 probe\""),
            Some(("name", "\"#1 probe\""))
        );
        assert_eq!(parse_key_value("a ="), None);
        assert_eq!(parse_key_value("no equals"), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<u8>("72"), Ok(72));
        assert_eq!(parse_int::<u8>("0x48"), Ok(0x48));
        assert_eq!(parse_int::<u32>("100_000"), Ok(100_000));
        assert_eq!(parse_int::<u8>("256"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u8>("-1"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u16>("ten"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u32>("0x"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u32>("99999999999"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_pin() {
        assert_eq!(parse_pin("gpio4"), Ok(4));
        assert_eq!(parse_pin("\"gpio25\""), Ok(25));
        assert_eq!(parse_pin("pin4"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpio30"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert_eq!(
            parse_board_config("[sensor]\naddress = 0x80\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_board_config("[light]\npwm_top = 0\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_board_config("[startup]\nsample_count = 300\n"),
            Err(ParseError::InvalidValue)
        );
    }
}
