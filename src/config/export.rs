// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// JSON register document output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Target file or directory. Without one the document is written next to
    /// the register source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Indent the JSON document
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: None,
            pretty: true,
        }
    }
}
