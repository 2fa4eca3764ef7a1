// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register address table
//!
//! The table keeps definitions in declaration order so that exported
//! documents list registers exactly as the source header does. Lookups are
//! linear: firmware register maps hold tens of entries, not thousands.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::address_space::{AddressSpace, ValueDomain};
use super::register::RegisterDefinition;
use crate::error::{RegisterMapError, Result};

/// Provenance information carried by register headers and documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// A problem found by [`RegisterTable::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("register name '{name}' is defined more than once")]
    DuplicateName { name: String },

    #[error("{space} offset {offset} is claimed by both '{first}' and '{second}'")]
    OffsetCollision {
        space: AddressSpace,
        offset: u16,
        first: String,
        second: String,
    },

    #[error("'{name}' covers no offset (len is 0)")]
    EmptySpan { name: String },

    #[error("'{name}' runs past the end of the address space (offset {offset}, len {len})")]
    SpanOverflow { name: String, offset: u16, len: u16 },

    #[error("'{name}' is a {space} but its name ends like a {suffix_space}")]
    SuffixMismatch {
        name: String,
        space: AddressSpace,
        suffix_space: AddressSpace,
    },

    #[error("'{name}' has a malformed documented range: {reason}")]
    MalformedRange { name: String, reason: String },

    #[error("'{name}' documents range [{min}, {max}] outside its value domain {domain}")]
    RangeOutsideDomain {
        name: String,
        min: i64,
        max: i64,
        domain: ValueDomain,
    },
}

/// Immutable mapping from symbolic register names to offsets in the four
/// Modbus address spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterTable {
    definitions: Vec<RegisterDefinition>,
    meta: TableMeta,
}

impl RegisterTable {
    /// Create a table from definitions in declaration order.
    ///
    /// The table is not validated, see [`RegisterTable::validate`].
    pub fn new(definitions: Vec<RegisterDefinition>) -> Self {
        Self {
            definitions,
            meta: TableMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: TableMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn meta(&self) -> &TableMeta {
        &self.meta
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &RegisterDefinition> {
        self.definitions.iter()
    }

    /// Definitions of one address space in declaration order
    pub fn in_space(&self, space: AddressSpace) -> impl Iterator<Item = &RegisterDefinition> {
        self.definitions.iter().filter(move |def| def.space == space)
    }

    /// Number of definitions in `space`
    pub fn count(&self, space: AddressSpace) -> usize {
        self.in_space(space).count()
    }

    /// Look up a register by its symbolic name.
    pub fn lookup(&self, name: &str) -> Option<&RegisterDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }

    /// The definition starting exactly at `offset` in `space`
    pub fn at(&self, space: AddressSpace, offset: u16) -> Option<&RegisterDefinition> {
        self.in_space(space).find(|def| def.offset == offset)
    }

    /// The definition whose span contains `offset`, which finds the owner of
    /// the high half of a wide pair as well.
    pub fn covering(&self, space: AddressSpace, offset: u16) -> Option<&RegisterDefinition> {
        self.in_space(space).find(|def| def.contains_offset(offset))
    }

    /// Load a table from a register header (`.h`), a JSON document or a YAML
    /// document, chosen by file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        debug!("Loading register table from {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|source| RegisterMapError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match extension.as_deref() {
            Some("h") | Some("hpp") => crate::header::parse_register_header(&contents),
            Some("json") => Ok(serde_json::from_str(&contents)?),
            Some("yaml") | Some("yml") => Ok(serde_yml::from_str(&contents)?),
            _ => Err(RegisterMapError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Collect every consistency problem of the table.
    ///
    /// Nothing in a register header enforces these rules; a consumer exposing
    /// the table relies on them, so they are checked once after loading.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for def in &self.definitions {
            if !seen.insert(&*def.name) {
                issues.push(ValidationIssue::DuplicateName {
                    name: def.name.to_string(),
                });
            }
        }

        for def in &self.definitions {
            issues.extend(check_definition(def));
        }

        for space in AddressSpace::ALL {
            issues.extend(self.collisions(space));
        }

        if !issues.is_empty() {
            debug!("Register table validation found {} issue(s)", issues.len());
        }
        issues
    }

    /// Validate and fail on the first non-empty issue list.
    pub fn check(&self) -> Result<()> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(RegisterMapError::Invalid(issues))
        }
    }

    fn collisions(&self, space: AddressSpace) -> Vec<ValidationIssue> {
        let mut defs: Vec<&RegisterDefinition> = self.in_space(space).collect();
        defs.sort_by_key(|def| def.offset);

        let mut issues = Vec::new();
        let mut owner: Option<(&RegisterDefinition, u32)> = None;
        for def in defs {
            // a zero-length definition still claims its start offset
            let end = u32::from(def.offset) + u32::from(def.len.max(1));
            match owner {
                Some((previous, previous_end)) if u32::from(def.offset) < previous_end => {
                    issues.push(ValidationIssue::OffsetCollision {
                        space,
                        offset: def.offset,
                        first: previous.name.to_string(),
                        second: def.name.to_string(),
                    });
                    if end > previous_end {
                        owner = Some((def, end));
                    }
                }
                _ => owner = Some((def, end)),
            }
        }
        issues
    }
}

fn check_definition(def: &RegisterDefinition) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if def.len == 0 {
        issues.push(ValidationIssue::EmptySpan {
            name: def.name.to_string(),
        });
    }

    if def.span().end > u32::from(u16::MAX) + 1 {
        issues.push(ValidationIssue::SpanOverflow {
            name: def.name.to_string(),
            offset: def.offset,
            len: def.len,
        });
    }

    if let Some(suffix_space) = AddressSpace::from_register_name(&def.name) {
        if suffix_space != def.space {
            issues.push(ValidationIssue::SuffixMismatch {
                name: def.name.to_string(),
                space: def.space,
                suffix_space,
            });
        }
    }

    match def.documented_range() {
        Some(Ok((min, max))) => {
            let domain = def.value_domain();
            if !domain.contains(min) || !domain.contains(max) {
                issues.push(ValidationIssue::RangeOutsideDomain {
                    name: def.name.to_string(),
                    min,
                    max,
                    domain,
                });
            }
        }
        Some(Err(reason)) => {
            warn!("Register '{}' has an unreadable range '{}'", def.name, def.range);
            issues.push(ValidationIssue::MalformedRange {
                name: def.name.to_string(),
                reason,
            });
        }
        None => {}
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(defs: Vec<RegisterDefinition>) -> RegisterTable {
        RegisterTable::new(defs)
    }

    #[test]
    fn test_valid_table_has_no_issues() {
        let table = table(vec![
            RegisterDefinition::new("A_HREG", AddressSpace::HoldingRegister, 10).with_len(2),
            RegisterDefinition::new("B_HREG", AddressSpace::HoldingRegister, 12),
            // same offset in another space is fine
            RegisterDefinition::new("A_COIL", AddressSpace::Coil, 10),
        ]);
        assert!(table.validate().is_empty());
        assert!(table.check().is_ok());
    }

    #[test]
    fn test_same_offset_collides() {
        let table = table(vec![
            RegisterDefinition::new("A_COIL", AddressSpace::Coil, 3),
            RegisterDefinition::new("B_COIL", AddressSpace::Coil, 3),
        ]);
        assert_eq!(
            table.validate(),
            vec![ValidationIssue::OffsetCollision {
                space: AddressSpace::Coil,
                offset: 3,
                first: "A_COIL".to_string(),
                second: "B_COIL".to_string(),
            }]
        );
    }

    #[test]
    fn test_wide_pair_overlap_collides() {
        let table = table(vec![
            RegisterDefinition::new("LOOP_IREG", AddressSpace::InputRegister, 10).with_len(2),
            RegisterDefinition::new("UPTIME_IREG", AddressSpace::InputRegister, 11).with_len(2),
        ]);
        let issues = table.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            ValidationIssue::OffsetCollision { offset: 11, .. }
        ));
    }

    #[test]
    fn test_duplicate_name_and_suffix_mismatch() {
        let table = table(vec![
            RegisterDefinition::new("X_HREG", AddressSpace::HoldingRegister, 1),
            RegisterDefinition::new("X_HREG", AddressSpace::InputRegister, 1),
        ]);
        let issues = table.validate();
        assert!(issues.contains(&ValidationIssue::DuplicateName {
            name: "X_HREG".to_string()
        }));
        assert!(issues.iter().any(|issue| matches!(
            issue,
            ValidationIssue::SuffixMismatch {
                space: AddressSpace::InputRegister,
                suffix_space: AddressSpace::HoldingRegister,
                ..
            }
        )));
    }

    #[test]
    fn test_range_outside_single_register_domain() {
        let table = table(vec![RegisterDefinition::new(
            "BIG_HREG",
            AddressSpace::HoldingRegister,
            0,
        )
        .with_range("0, 100000")]);
        assert!(matches!(
            table.check(),
            Err(RegisterMapError::Invalid(issues))
                if matches!(issues[0], ValidationIssue::RangeOutsideDomain { max: 100_000, .. })
        ));
    }

    #[test]
    fn test_span_overflow_and_empty_span() {
        let table = table(vec![
            RegisterDefinition::new("END_IREG", AddressSpace::InputRegister, u16::MAX).with_len(2),
            RegisterDefinition::new("NONE_IREG", AddressSpace::InputRegister, 5).with_len(0),
        ]);
        let issues = table.validate();
        assert!(issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::SpanOverflow { .. })));
        assert!(issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::EmptySpan { .. })));
    }

    #[test]
    fn test_covering_finds_high_half_owner() {
        let table = table(vec![RegisterDefinition::new(
            "UPTIME_MS_IREG",
            AddressSpace::InputRegister,
            12,
        )
        .with_len(2)]);
        assert!(table.at(AddressSpace::InputRegister, 13).is_none());
        assert_eq!(
            table
                .covering(AddressSpace::InputRegister, 13)
                .map(|def| def.name()),
            Some("UPTIME_MS_IREG")
        );
        assert!(table.covering(AddressSpace::HoldingRegister, 13).is_none());
    }
}
