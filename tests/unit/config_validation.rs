//! Unit tests for configuration validation.

use stepgen_dds::config::{parse_config, validate_config, SystemConfig};
use stepgen_dds::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
clock_frequency = 50_000_000

[stepgens.x]
pick_off = { position = 28, velocity = 28, acceleration = 28 }

[stepgens.x.timing]
steplen_ns = 320
dir_hold_ns = 320
dir_setup_ns = 640
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a zero clock frequency.
#[test]
fn test_zero_clock_frequency() {
    let toml_str = r#"
clock_frequency = 0

[stepgens.x]
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidClockFrequency(0)))
    ));
}

/// Test validation fails when a timing does not fit a 32-bit counter.
#[test]
fn test_timing_overflow() {
    let toml_str = r#"
clock_frequency = 4_000_000_000

[stepgens.x.timing]
steplen_ns = 4_000_000_000
"#;

    let result = parse_config(toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::TimingOverflow {
            nanos: 4_000_000_000,
            clock_frequency: 4_000_000_000
        }))
    ));
}

/// Test that sub-cycle timings round up rather than vanish.
#[test]
fn test_timing_rounds_up() {
    let config = parse_config(
        r#"
clock_frequency = 50_000_000

[stepgens.x.timing]
steplen_ns = 1
dir_hold_ns = 21
"#,
    )
    .unwrap();

    let timing = config
        .stepgen("x")
        .unwrap()
        .timing
        .to_cycles(config.clock_frequency)
        .unwrap();
    assert_eq!(timing.pulse_width, 1);
    assert_eq!(timing.dir_hold, 2);
    assert_eq!(timing.dir_setup, 0);
}

/// Test that empty configuration is valid.
#[test]
fn test_empty_config_is_valid() {
    let config = SystemConfig::default();
    assert!(validate_config(&config).is_ok());
}
