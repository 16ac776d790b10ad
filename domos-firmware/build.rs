//! Build script for domos-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates module.toml and generates the provisioning constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs taken by the console UART
const UART_PINS: [i64; 2] = [0, 1];

/// The only PWM-capable line wired to the output filter
const PWM_PIN: i64 = 6;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    let module = validate_config();
    generate_constants(&out_dir, &module);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated provisioning values
struct ModuleFile {
    address_pins: Vec<u8>,
    output_pin: u8,
    storage_chip_select: Option<u8>,
}

/// Validate module.toml at compile time
fn validate_config() -> ModuleFile {
    println!("cargo:rerun-if-changed=module.toml");

    let config_path = Path::new("module.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: module.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware needs a module.toml provisioning file in the       ║\n\
            ║  domos-firmware directory.                                       ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read module.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in module.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    let address_pins = validate_address_pins(&config, &mut errors);
    let output_pin = validate_output_pin(&config, &mut errors);
    let storage_chip_select = validate_chip_select(&config, &mut errors);

    if let (Some(output), Some(pins)) = (output_pin, address_pins.as_ref()) {
        if pins.contains(&output) {
            errors.push(format!("output_pin {} is also an address pin", output));
        }
    }
    if let (Some(cs), Some(pins)) = (storage_chip_select, address_pins.as_ref()) {
        if pins.contains(&cs) || cs as i64 == PWM_PIN {
            errors.push(format!("storage_chip_select GPIO{} is already in use", cs));
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid module configuration                             ║\n\
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

    println!("cargo:warning=module.toml validated successfully");

    ModuleFile {
        address_pins: address_pins.unwrap_or_default(),
        output_pin: output_pin.unwrap_or(PWM_PIN as u8),
        storage_chip_select,
    }
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

/// A GPIO number the module can drive
fn gpio(value: &toml::Value, key: &str, errors: &mut Vec<String>) -> Option<u8> {
    match value {
        toml::Value::Integer(n) if (0..30).contains(n) => {
            if UART_PINS.contains(n) {
                errors.push(format!("{} uses GPIO{}, reserved for the UART", key, n));
                None
            } else {
                Some(*n as u8)
            }
        }
        toml::Value::Integer(n) => {
            errors.push(format!("{} GPIO{} does not exist (0-29)", key, n));
            None
        }
        _ => {
            errors.push(format!("{} must be an integer", key));
            None
        }
    }
}

fn validate_address_pins(config: &toml::Value, errors: &mut Vec<String>) -> Option<Vec<u8>> {
    let pins = match config.get("address_pins") {
        Some(toml::Value::Array(pins)) => pins,
        Some(_) => {
            errors.push("address_pins must be an array".to_string());
            return None;
        }
        None => {
            errors.push("Missing 'address_pins'".to_string());
            return None;
        }
    };

    if pins.is_empty() || pins.len() > 8 {
        errors.push(format!("address_pins needs 1-8 entries, got {}", pins.len()));
        return None;
    }

    let mut result = Vec::new();
    for pin in pins {
        let pin = gpio(pin, "address_pins", errors)?;
        if result.contains(&pin) {
            errors.push(format!("address_pins lists GPIO{} twice", pin));
            return None;
        }
        if pin as i64 == PWM_PIN {
            errors.push(format!("address_pins uses GPIO{}, the PWM output", pin));
            return None;
        }
        result.push(pin);
    }
    Some(result)
}

fn validate_output_pin(config: &toml::Value, errors: &mut Vec<String>) -> Option<u8> {
    match config.get("output_pin") {
        None => Some(PWM_PIN as u8),
        Some(value) => {
            let pin = gpio(value, "output_pin", errors)?;
            if pin as i64 != PWM_PIN {
                errors.push(format!("output_pin must be GPIO{}", PWM_PIN));
                return None;
            }
            Some(pin)
        }
    }
}

fn validate_chip_select(config: &toml::Value, errors: &mut Vec<String>) -> Option<u8> {
    let value = config.get("storage_chip_select")?;
    gpio(value, "storage_chip_select", errors)
}

/// Write the provisioning constants included by main.rs
fn generate_constants(out_dir: &Path, module: &ModuleFile) {
    let pins = module
        .address_pins
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let chip_select = match module.storage_chip_select {
        Some(cs) => format!("Some({})", cs),
        None => "None".to_string(),
    };

    let source = format!(
        "// Generated from module.toml by build.rs\n\
         pub const ADDRESS_PINS: &[u8] = &[{}];\n\
         pub const OUTPUT_PIN: u8 = {};\n\
         pub const STORAGE_CHIP_SELECT: Option<u8> = {};\n",
        pins, module.output_pin, chip_select
    );

    let mut f = File::create(out_dir.join("module_config.rs")).unwrap();
    f.write_all(source.as_bytes()).unwrap();
}
