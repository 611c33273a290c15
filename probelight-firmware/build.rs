//! Build script for probelight-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pins the firmware binds at startup; board.toml must agree
const WIRED_PINS: [(&str, &str, &str); 3] = [
    ("sensor", "sda_pin", "gpio4"),
    ("sensor", "scl_pin", "gpio5"),
    ("light", "pin", "gpio25"),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the probelight-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sensor(&config, &mut errors);
    validate_light(&config, &mut errors);
    validate_startup(&config, &mut errors);
    validate_wiring(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check that `section.key`, if present, is an integer in `min..=max`
fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match config.get(section).and_then(|s| s.get(key)) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

/// Check that `section.name`, if present, is a short string
fn check_name(config: &toml::Value, section: &str, errors: &mut Vec<String>) {
    match config.get(section).and_then(|s| s.get("name")) {
        None => {}
        Some(toml::Value::String(name)) if name.chars().count() > 10 => {
            println!(
                "cargo:warning=[{}] name '{}' will be truncated to 10 characters",
                section, name
            );
        }
        Some(toml::Value::String(_)) => {}
        Some(_) => errors.push(format!("[{}] name must be a string", section)),
    }
}

fn validate_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    if config.get("sensor").is_none() {
        errors.push("Missing [sensor] section".to_string());
        return;
    }
    check_name(config, "sensor", errors);
    check_range(config, "sensor", "address", 0x08, 0x77, errors);
    check_range(config, "sensor", "i2c_frequency", 10_000, 1_000_000, errors);
}

fn validate_light(config: &toml::Value, errors: &mut Vec<String>) {
    if config.get("light").is_none() {
        errors.push("Missing [light] section".to_string());
        return;
    }
    check_name(config, "light", errors);
    check_range(config, "light", "pwm_top", 1, 65_535, errors);
}

fn validate_startup(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "startup", "pulse_count", 0, 255, errors);
    check_range(config, "startup", "sample_count", 1, 255, errors);
    check_range(config, "startup", "sample_period_s", 1, 65_535, errors);
    check_range(config, "startup", "error_blinks", 0, 255, errors);
}

/// Pins are bound to typed peripherals at compile time, so board.toml can
/// only describe the wiring, not change it
fn validate_wiring(config: &toml::Value, errors: &mut Vec<String>) {
    for (section, key, wired) in WIRED_PINS {
        match config.get(section).and_then(|s| s.get(key)) {
            None => {}
            Some(toml::Value::String(pin)) if pin == wired => {}
            Some(other) => errors.push(format!(
                "[{}] {} is {}, firmware is wired for \"{}\"",
                section, key, other, wired
            )),
        }
    }
}
