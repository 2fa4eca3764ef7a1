// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::build_info::{BuildMetadata, VersionCodePolicy};
use crate::error::Result;

/// Build metadata source and reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// `vcsInfo.h`-style header; the built-in firmware metadata when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Report the declared firmware version (`literal`) or the one derived
    /// from the software version parts (`derived`)
    pub version_code: VersionCodePolicy,
}

impl BuildConfig {
    pub fn load_metadata(&self) -> Result<BuildMetadata> {
        match &self.source {
            Some(path) => BuildMetadata::from_header(path),
            None => Ok(BuildMetadata::FIRMWARE),
        }
    }
}
