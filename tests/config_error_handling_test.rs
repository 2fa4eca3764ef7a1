// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use modbus_register_map::config::Config;
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::tempdir;

static INIT: Once = Once::new();

// Setup logger for tests
fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

#[test]
fn test_config_schema_error_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Valid YAML, but the word order is not one the schema allows
    let invalid_yaml = r#"
registers:
  word_order: "middle_endian"
  strict: "yes"
"#;
    fs::write(&config_path, invalid_yaml)?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Config loading should have failed");

    let sample_path = config_path.with_extension("sample.yaml");
    assert!(
        Path::new(&sample_path).exists(),
        "Sample config file was not created"
    );

    let sample_config = Config::from_file(&sample_path)?;
    assert_eq!(sample_config, Config::default());

    Ok(())
}

#[test]
fn test_unknown_section_is_rejected() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    fs::write(&config_path, "modbus:\n  port: 502\n")?;

    assert!(Config::from_file(&config_path).is_err());
    assert!(config_path.with_extension("sample.yaml").exists());
    Ok(())
}

#[test]
fn test_specific_rules_error_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Passes the schema but the register source is neither a header nor a document
    let invalid_config = r#"
registers:
  source: "firmware/registers.csv"
build:
  source: "firmware/vcsInfo.h"
"#;
    fs::write(&config_path, invalid_config)?;

    let error = Config::from_file(&config_path).expect_err("Config loading should have failed");
    assert!(error.to_string().contains("registers.csv"));
    assert!(config_path.with_extension("sample.yaml").exists());

    let build_config_path = temp_dir.path().join("build.yaml");
    fs::write(&build_config_path, "build:\n  source: \"vcsInfo.json\"\n")?;
    assert!(Config::from_file(&build_config_path).is_err());

    Ok(())
}
