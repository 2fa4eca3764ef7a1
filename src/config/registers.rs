// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register table source configuration

use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::modbus::{RegisterTable, WordOrder};

/// Where the register table comes from and how it is interpreted.
///
/// # Example
///
/// ```
/// use modbus_register_map::config::RegistersConfig;
/// use modbus_register_map::modbus::WordOrder;
///
/// let registers = RegistersConfig {
///     source: None,
///     word_order: WordOrder::HighWordFirst,
///     strict: true,
/// };
/// assert_eq!(registers.load_table().unwrap().len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistersConfig {
    /// Register header (`.h`) or register document (`.json`, `.yaml`).
    ///
    /// When absent the built-in firmware table is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Word order of 32-bit values stored in two registers.
    ///
    /// Default is `low_word_first`: the lower half sits at the first offset.
    pub word_order: WordOrder,

    /// Refuse a table that fails validation instead of only logging the issues.
    pub strict: bool,
}

impl Default for RegistersConfig {
    fn default() -> Self {
        Self {
            source: None,
            word_order: WordOrder::default(),
            strict: true,
        }
    }
}

impl RegistersConfig {
    /// Load the configured table, without validating it.
    pub fn load_table(&self) -> Result<RegisterTable> {
        match &self.source {
            Some(path) => RegisterTable::load(path),
            None => {
                debug!("No register source configured, using the built-in firmware table");
                Ok(RegisterTable::firmware())
            }
        }
    }
}
