// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error types shared by the register table, the header parsers and the
//! build metadata codec.

use std::path::PathBuf;

use thiserror::Error;

use crate::modbus::ValidationIssue;

/// Errors raised while loading, parsing or checking register maps and build metadata
#[derive(Error, Debug)]
pub enum RegisterMapError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Unknown define '{name}'")]
    UnknownDefine { name: String },

    #[error("Define '{name}' is part of an alias cycle")]
    AliasCycle { name: String },

    #[error("Required define '{name}' is missing")]
    MissingDefine { name: String },

    #[error("Define '{name}' has value {value} which does not fit in {target}")]
    ValueOutOfRange {
        name: String,
        value: i64,
        target: &'static str,
    },

    #[error("'{alias}' resolves to {found} but '{target}' is {expected}")]
    AliasMismatch {
        alias: String,
        target: String,
        found: i64,
        expected: i64,
    },

    #[error("Invalid commit hash '{sha}': {reason}")]
    InvalidCommitSha { sha: String, reason: String },

    #[error("JSON register document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML register document error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported register file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Register table failed validation with {} issue(s): {}", .0.len(), join_issues(.0))]
    Invalid(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, RegisterMapError>;
