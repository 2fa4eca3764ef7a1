// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the register map tool
//!
//! The configuration is backed by a YAML file and validated against an
//! embedded JSON schema before it is deserialized.
//!
//! ## Configuration Structure
//!
//! - `registers`: register table source, word order and strictness
//! - `build`: build metadata source and version code policy
//! - `export`: JSON register document output
//!
//! ## Usage
//!
//! ```no_run
//! use modbus_register_map::config::Config;
//! use modbus_register_map::modbus::WordOrder;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("firmware/modbusRegisters.h".into()), // Register source
//!     Some(WordOrder::HighWordFirst),            // Word order
//!     None,                                      // Strict validation
//!     None,                                      // Build metadata source
//!     None,                                      // Version code policy
//!     Some("out".into()),                        // Output
//!     Some(false),                               // Pretty JSON
//! );
//!
//! println!("Word order: {}", config.registers.word_order);
//! ```

pub mod build;
pub mod export;
pub mod registers;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::build_info::VersionCodePolicy;
use crate::modbus::WordOrder;

pub use build::BuildConfig;
pub use export::ExportConfig;
pub use registers::RegistersConfig;
pub use utils::{output_config_schema, validate_specific_rules, CONFIG_SCHEMA};

/// Root configuration structure.
///
/// Every section falls back to its defaults when missing, so an empty file is
/// a valid configuration that exports the built-in firmware table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registers: RegistersConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // An empty document is the default configuration
        let yaml_value: serde_yml::Value = if contents.trim().is_empty() {
            serde_yml::Value::Mapping(serde_yml::Mapping::new())
        } else {
            serde_yml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?
        };

        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        let schema: serde_json::Value =
            serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only the arguments that are `Some` override the loaded configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_args(
        &mut self,
        register_source: Option<PathBuf>,
        word_order: Option<WordOrder>,
        strict: Option<bool>,
        build_source: Option<PathBuf>,
        version_code: Option<VersionCodePolicy>,
        output: Option<PathBuf>,
        pretty: Option<bool>,
    ) {
        if let Some(source) = register_source {
            debug!("Overriding register source from command line: {:?}", source);
            self.registers.source = Some(source);
        }
        if let Some(order) = word_order {
            debug!("Overriding word order from command line: {}", order);
            self.registers.word_order = order;
        }
        if let Some(strict) = strict {
            debug!("Overriding strict validation from command line: {}", strict);
            self.registers.strict = strict;
        }

        if let Some(source) = build_source {
            debug!("Overriding build metadata source from command line: {:?}", source);
            self.build.source = Some(source);
        }
        if let Some(policy) = version_code {
            debug!("Overriding version code policy from command line: {:?}", policy);
            self.build.version_code = policy;
        }

        if let Some(output) = output {
            debug!("Overriding output from command line: {:?}", output);
            self.export.output = Some(output);
        }
        if let Some(pretty) = pretty {
            debug!("Overriding pretty output from command line: {}", pretty);
            self.export.pretty = pretty;
        }
    }
}
