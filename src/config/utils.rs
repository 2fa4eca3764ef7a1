// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! Schema output and the checks the JSON schema cannot express.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use super::Config;

/// JSON schema every configuration file is validated against
pub const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

const REGISTER_SOURCE_EXTENSIONS: [&str; 5] = ["h", "hpp", "json", "yaml", "yml"];
const BUILD_SOURCE_EXTENSIONS: [&str; 2] = ["h", "hpp"];

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./register-map --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;
    println!("{}", formatted_schema);
    Ok(())
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

/// Validates the configuration against rules the JSON schema does not cover.
///
/// - the register source must be a header, a JSON or a YAML document
/// - the build metadata source must be a header
/// - an output with another extension than `.json` is accepted, the exporter
///   replaces the extension
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if let Some(source) = &config.registers.source {
        if !has_extension(source, &REGISTER_SOURCE_EXTENSIONS) {
            anyhow::bail!(
                "Register source {:?} must be one of: .{}",
                source,
                REGISTER_SOURCE_EXTENSIONS.join(", .")
            );
        }
    }

    if let Some(source) = &config.build.source {
        if !has_extension(source, &BUILD_SOURCE_EXTENSIONS) {
            anyhow::bail!("Build metadata source {:?} must be a C header", source);
        }
    }

    if let Some(output) = &config.export.output {
        if output.extension().is_some() && !has_extension(output, &["json"]) {
            warn!("Output {:?} will be written with a .json extension", output);
        }
    }

    Ok(())
}
