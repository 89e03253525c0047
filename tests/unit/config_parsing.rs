//! Unit tests for TOML configuration parsing.

use stepgen_dds::config::{PickOff, StepTiming, SystemConfig};

/// Test parsing a fully specified channel.
#[test]
fn test_parse_stepgen_config() {
    let toml_str = r#"
clock_frequency = 50_000_000

[stepgens.x]
soft_stop = true
invert_direction = true
pick_off = { position = 32, velocity = 40, acceleration = 48 }

[stepgens.x.timing]
steplen_ns = 5000
dir_hold_ns = 5000
dir_setup_ns = 10000
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let x = config.stepgen("x").expect("Stepgen not found");

    assert!(x.soft_stop);
    assert!(x.invert_direction);
    assert_eq!(x.pick_off, PickOff::new(32, 40, 48).unwrap());
    assert_eq!(
        x.timing.to_cycles(config.clock_frequency).unwrap(),
        StepTiming::new(250, 250, 500)
    );
}

/// Test that omitted fields fall back to their defaults.
#[test]
fn test_defaults_for_omitted_fields() {
    let toml_str = r#"
clock_frequency = 25_000_000

[stepgens.a]

[stepgens.b]
soft_stop = true
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let a = config.stepgen("a").expect("Stepgen not found");

    assert_eq!(a.pick_off, PickOff::default());
    assert!(!a.soft_stop);
    assert_eq!(
        a.timing.to_cycles(config.clock_frequency).unwrap(),
        StepTiming::default()
    );

    let names: Vec<_> = config.stepgen_names().collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"b"));
}

/// Test that an unordered pick-off triple is rejected during parsing.
#[test]
fn test_unordered_pick_off_rejected() {
    let toml_str = r#"
clock_frequency = 50_000_000

[stepgens.x]
pick_off = { position = 32, velocity = 48, acceleration = 40 }
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err(), "Should reject acceleration below velocity");
}

/// Test that a fraction span wider than the velocity register allows is rejected.
#[test]
fn test_wide_fraction_rejected() {
    let toml_str = r#"
clock_frequency = 50_000_000

[stepgens.x]
pick_off = { position = 0, velocity = 8, acceleration = 41 }
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err(), "Should reject 33 fraction bits");
}

/// Test that the clock frequency is required.
#[test]
fn test_missing_clock_frequency() {
    let toml_str = r#"
[stepgens.x]
soft_stop = true
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("stepgen_dds_load_config.toml");
    std::fs::write(
        &path,
        "clock_frequency = 1_000_000\n\n[stepgens.z]\nsoft_stop = true\n",
    )
    .unwrap();

    let config = stepgen_dds::load_config(&path).expect("Failed to load config");
    assert_eq!(config.clock_frequency, 1_000_000);
    assert!(config.stepgen("z").unwrap().soft_stop);

    let _ = std::fs::remove_file(&path);
}

/// Test that a missing file reports an I/O error.
#[test]
fn test_load_missing_file() {
    let result = stepgen_dds::load_config("/nonexistent/stepgen.toml");
    assert!(matches!(
        result,
        Err(stepgen_dds::Error::Config(
            stepgen_dds::error::ConfigError::IoError(_)
        ))
    ));
}
