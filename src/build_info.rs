// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Firmware build metadata
//!
//! Firmware identifies its build through a handful of integers that fit in
//! 16-bit registers: the version numbers, the creation day counted from the
//! Unix epoch and the short commit hash packed two ASCII characters per word.
//! This module holds those values, decodes them back into readable form and
//! loads them from a `vcsInfo.h`-style header.

use std::fmt;
use std::path::Path;

use chrono::{Days, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{RegisterMapError, Result};
use crate::header::DefineTable;

/// Build constants of the example firmware, as declared in its header
pub mod vcs {
    pub const CURRENT_FIRMWARE_VERSION: u32 = 191;
    pub const MAJOR_SW_VERSION: u16 = 1;
    pub const MINOR_SW_VERSION: u16 = 9;
    pub const PATCH_SW_VERSION: u16 = 1;
    pub const SW_VERSION: u32 = CURRENT_FIRMWARE_VERSION;

    /// Days since 1970-01-01
    pub const CREATION_DATE: u32 = 18832;
    /// DD M YY
    pub const ANNIVERSARY: u32 = 26318;

    // d3298580
    pub const COMMIT_SHA_I: u16 = 25651;
    pub const COMMIT_SHA_II: u16 = 12857;
    pub const COMMIT_SHA_III: u16 = 14389;
    pub const COMMIT_SHA_IV: u16 = 14384;
}

/// Number of characters a commit hash keeps once packed into four words
pub const COMMIT_SHA_CHARS: usize = 8;

/// A `major.minor.patch` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Decimal concatenation of the three parts: `1.9.1` gives `191`.
    pub fn version_code(&self) -> u64 {
        let patch = u64::from(self.patch);
        let minor = u64::from(self.minor) * 10u64.pow(decimal_digits(self.patch));
        let major =
            u64::from(self.major) * 10u64.pow(decimal_digits(self.minor) + decimal_digits(self.patch));
        major + minor + patch
    }
}

fn decimal_digits(value: u16) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which number reports the combined firmware version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionCodePolicy {
    /// The declared `CURRENT_FIRMWARE_VERSION`, whatever the version parts say
    #[default]
    Literal,
    /// The code derived from the software version parts
    Derived,
}

/// Identifying values of one firmware build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    pub firmware_version: u32,
    pub software: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Version>,
    /// Days since 1970-01-01
    pub creation_date: u32,
    /// `DD M YY` digits, e.g. 26318 for 26 March 2018
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anniversary: Option<u32>,
    pub commit_sha: [u16; 4],
}

impl BuildMetadata {
    /// Metadata of the example firmware
    pub const FIRMWARE: BuildMetadata = BuildMetadata {
        firmware_version: vcs::CURRENT_FIRMWARE_VERSION,
        software: Version::new(
            vcs::MAJOR_SW_VERSION,
            vcs::MINOR_SW_VERSION,
            vcs::PATCH_SW_VERSION,
        ),
        hardware: None,
        creation_date: vcs::CREATION_DATE,
        anniversary: Some(vcs::ANNIVERSARY),
        commit_sha: [
            vcs::COMMIT_SHA_I,
            vcs::COMMIT_SHA_II,
            vcs::COMMIT_SHA_III,
            vcs::COMMIT_SHA_IV,
        ],
    };

    /// `SW_VERSION` is an alias of the firmware version
    pub fn sw_version(&self) -> u32 {
        self.firmware_version
    }

    /// Version code computed from the software version parts
    pub fn derived_version_code(&self) -> u64 {
        self.software.version_code()
    }

    /// `true` when the declared firmware version agrees with the version parts
    pub fn version_code_matches(&self) -> bool {
        u64::from(self.firmware_version) == self.derived_version_code()
    }

    /// Version code reported to the outside.
    ///
    /// # Arguments
    ///
    /// * `policy` - `Literal` keeps the declared firmware version, `Derived`
    ///   computes the code from major, minor and patch
    ///
    /// # Returns
    ///
    /// The selected version code, `191` for firmware 1.9.1 either way
    pub fn effective_version_code(&self, policy: VersionCodePolicy) -> u64 {
        match policy {
            VersionCodePolicy::Literal => u64::from(self.firmware_version),
            VersionCodePolicy::Derived => self.derived_version_code(),
        }
    }

    /// The four `COMMIT_SHA_*` words, two ASCII characters each
    pub fn commit_sha_fragments(&self) -> [u16; 4] {
        self.commit_sha
    }

    /// The short commit hash packed in the four fragments
    pub fn commit_sha(&self) -> Result<String> {
        decode_commit_sha(&self.commit_sha)
    }

    /// Build date, `CREATION_DATE` being days since 1970-01-01
    pub fn creation_date(&self) -> Option<NaiveDate> {
        date_from_epoch_days(self.creation_date)
    }

    /// Anniversary date decoded from its `DD M YY` digits
    pub fn anniversary_date(&self) -> Option<NaiveDate> {
        self.anniversary.and_then(decode_day_month_year)
    }

    /// Collect build metadata from parsed header constants.
    ///
    /// `SW_VERSION`, when declared, must resolve to the same value as
    /// `CURRENT_FIRMWARE_VERSION`.
    pub fn from_defines(defines: &DefineTable) -> Result<Self> {
        let firmware_version = required_u32(defines, "CURRENT_FIRMWARE_VERSION")?;

        if defines.contains("SW_VERSION") {
            let found = defines.resolve("SW_VERSION")?;
            if found != i64::from(firmware_version) {
                return Err(RegisterMapError::AliasMismatch {
                    alias: "SW_VERSION".to_string(),
                    target: "CURRENT_FIRMWARE_VERSION".to_string(),
                    found,
                    expected: i64::from(firmware_version),
                });
            }
        }

        let software = Version::new(
            required_u16(defines, "MAJOR_SW_VERSION")?,
            required_u16(defines, "MINOR_SW_VERSION")?,
            required_u16(defines, "PATCH_SW_VERSION")?,
        );

        let hardware = match (
            optional_u16(defines, "MAJOR_HW_VERSION")?,
            optional_u16(defines, "MINOR_HW_VERSION")?,
            optional_u16(defines, "PATCH_HW_VERSION")?,
        ) {
            (Some(major), Some(minor), Some(patch)) => Some(Version::new(major, minor, patch)),
            (None, None, None) => None,
            _ => {
                warn!("Hardware version is only partially declared, ignoring it");
                None
            }
        };

        let metadata = Self {
            firmware_version,
            software,
            hardware,
            creation_date: required_u32(defines, "CREATION_DATE")?,
            anniversary: optional_u32(defines, "ANNIVERSARY")?,
            commit_sha: [
                required_u16(defines, "COMMIT_SHA_I")?,
                required_u16(defines, "COMMIT_SHA_II")?,
                required_u16(defines, "COMMIT_SHA_III")?,
                required_u16(defines, "COMMIT_SHA_IV")?,
            ],
        };

        if !metadata.version_code_matches() {
            warn!(
                "Firmware version {} does not match software version {} (code {})",
                metadata.firmware_version,
                metadata.software,
                metadata.derived_version_code()
            );
        }
        Ok(metadata)
    }

    /// Load build metadata from a header file.
    pub fn from_header<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading build metadata from {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|source| RegisterMapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_defines(&DefineTable::parse(&contents))
    }

    /// Single line summary, e.g. `1.9.1 (191) d3298580`
    pub fn version_string(&self) -> String {
        let sha = self
            .commit_sha()
            .unwrap_or_else(|_| format!("{:?}", self.commit_sha));
        format!("{} ({}) {}", self.software, self.firmware_version, sha)
    }

    /// Multi-line report of every field
    pub fn full_info(&self) -> String {
        let commit = self.commit_sha().unwrap_or_else(|e| e.to_string());
        let created = self
            .creation_date()
            .map_or_else(|| "invalid".to_string(), |date| date.to_string());
        let hardware = self
            .hardware
            .map_or_else(|| "-".to_string(), |version| version.to_string());
        let mut info = format!(
            "Firmware Version: {}\n\
            Software Version: {} (code {})\n\
            Hardware Version: {}\n\
            Created: {} ({} days since epoch)\n\
            Commit: {} {:?}",
            self.firmware_version,
            self.software,
            self.derived_version_code(),
            hardware,
            created,
            self.creation_date,
            commit,
            self.commit_sha,
        );
        if let Some(anniversary) = self.anniversary {
            let date = self
                .anniversary_date()
                .map_or_else(|| "invalid".to_string(), |date| date.to_string());
            info.push_str(&format!("\nAnniversary: {date} ({anniversary})"));
        }
        info
    }
}

impl Default for BuildMetadata {
    fn default() -> Self {
        Self::FIRMWARE
    }
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version_string())
    }
}

fn resolve_optional(defines: &DefineTable, name: &str) -> Result<Option<i64>> {
    if defines.contains(name) {
        defines.resolve(name).map(Some)
    } else {
        Ok(None)
    }
}

fn narrow<T: TryFrom<i64>>(name: &str, value: i64, target: &'static str) -> Result<T> {
    T::try_from(value).map_err(|_| RegisterMapError::ValueOutOfRange {
        name: name.to_string(),
        value,
        target,
    })
}

fn optional_u16(defines: &DefineTable, name: &str) -> Result<Option<u16>> {
    resolve_optional(defines, name)?
        .map(|value| narrow(name, value, "u16"))
        .transpose()
}

fn optional_u32(defines: &DefineTable, name: &str) -> Result<Option<u32>> {
    resolve_optional(defines, name)?
        .map(|value| narrow(name, value, "u32"))
        .transpose()
}

fn required_u16(defines: &DefineTable, name: &str) -> Result<u16> {
    optional_u16(defines, name)?.ok_or_else(|| RegisterMapError::MissingDefine {
        name: name.to_string(),
    })
}

fn required_u32(defines: &DefineTable, name: &str) -> Result<u32> {
    optional_u32(defines, name)?.ok_or_else(|| RegisterMapError::MissingDefine {
        name: name.to_string(),
    })
}

/// Pack up to eight ASCII characters into four words, first character of
/// each pair in the high byte. Shorter hashes are padded with NUL bytes.
pub fn encode_commit_sha(sha: &str) -> Result<[u16; 4]> {
    let invalid = |reason: &str| RegisterMapError::InvalidCommitSha {
        sha: sha.to_string(),
        reason: reason.to_string(),
    };
    if !sha.is_ascii() {
        return Err(invalid("only ASCII characters can be packed"));
    }
    if sha.len() > COMMIT_SHA_CHARS {
        return Err(invalid("at most 8 characters fit in four words"));
    }

    let mut bytes = [0u8; COMMIT_SHA_CHARS];
    bytes[..sha.len()].copy_from_slice(sha.as_bytes());
    let mut words = [0u16; 4];
    for (word, pair) in words.iter_mut().zip(bytes.chunks_exact(2)) {
        *word = u16::from_be_bytes([pair[0], pair[1]]);
    }
    Ok(words)
}

/// Reverse of [`encode_commit_sha`]; trailing NUL padding is dropped.
pub fn decode_commit_sha(words: &[u16; 4]) -> Result<String> {
    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
    let text = String::from_utf8(bytes)
        .ok()
        .filter(|text| text.is_ascii())
        .ok_or_else(|| RegisterMapError::InvalidCommitSha {
            sha: format!("{words:?}"),
            reason: "fragments do not hold ASCII characters".to_string(),
        })?;
    Ok(text.trim_end_matches('\0').to_string())
}

pub fn date_from_epoch_days(days: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_days(Days::new(u64::from(days)))
}

/// Inverse of [`date_from_epoch_days`], `None` before the epoch
pub fn epoch_days(date: NaiveDate) -> Option<u32> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    u32::try_from(date.signed_duration_since(epoch).num_days()).ok()
}

/// Decode `DD M YY` / `DD MM YY` digits: two day digits, the month, then the
/// last two digits of a year in the 2000s.
fn decode_day_month_year(value: u32) -> Option<NaiveDate> {
    let digits = value.to_string();
    if !(5..=6).contains(&digits.len()) {
        return None;
    }
    let (day, rest) = digits.split_at(2);
    let (month, year) = rest.split_at(rest.len() - 2);
    NaiveDate::from_ymd_opt(
        2000 + year.parse::<i32>().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )
}
