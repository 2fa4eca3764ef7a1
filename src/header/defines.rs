// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! `#define` table of a C header
//!
//! Only object-like macros with an integer literal or a single identifier as
//! value are understood. Anything else is kept as raw text and refuses to
//! resolve.

use std::collections::HashSet;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::{RegisterMapError, Result};

static DEFINE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)(?:\s+([^\s/](?:[^/]*[^\s/])?))?\s*(?://(<)?\s*(.*?))?\s*$",
    )
    .expect("define line pattern is valid")
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Value of an object-like macro
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineValue {
    Literal(i64),
    /// Another macro name, e.g. `#define SW_VERSION CURRENT_FIRMWARE_VERSION`
    Alias(String),
    /// Anything that is neither, kept verbatim
    Raw(String),
}

/// One `#define` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    /// `None` for include guards such as `#define vcsInfo_h`
    pub value: Option<DefineValue>,
    /// Text after `//` or `//<`
    pub comment: Option<String>,
    /// `true` when the comment used the doxygen `//<` marker
    pub documented: bool,
    /// 1-based line number in the header
    pub line: usize,
}

/// Parse a single line, returning `None` when it is not a `#define`.
pub fn parse_define_line(line: &str, line_number: usize) -> Option<Define> {
    let captures = DEFINE_LINE.captures(line)?;
    let name = captures.get(1)?.as_str().to_string();
    let value = captures.get(2).map(|m| parse_value(m.as_str()));
    let documented = captures.get(3).is_some();
    let comment = captures.get(4).map(|m| m.as_str().to_string());
    Some(Define {
        name,
        value,
        comment,
        documented,
        line: line_number,
    })
}

fn parse_value(text: &str) -> DefineValue {
    let trimmed = text.trim_end_matches(['u', 'U', 'l', 'L']);
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse::<i64>().ok()
    };

    match parsed {
        Some(value) => DefineValue::Literal(value),
        None if IDENTIFIER.is_match(text) => DefineValue::Alias(text.to_string()),
        None => DefineValue::Raw(text.to_string()),
    }
}

/// All `#define` lines of a header in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineTable {
    defines: Vec<Define>,
}

impl DefineTable {
    /// Collect every `#define` of a header.
    ///
    /// # Arguments
    ///
    /// * `contents` - Header text; lines that are not a `#define` are ignored
    ///
    /// # Returns
    ///
    /// The table, which may hold several definitions of the same name
    pub fn parse(contents: &str) -> Self {
        let defines: Vec<Define> = contents
            .lines()
            .enumerate()
            .filter_map(|(index, line)| parse_define_line(line, index + 1))
            .collect();
        debug!("Parsed {} define(s)", defines.len());
        Self { defines }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Define> {
        self.defines.iter()
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// The last definition of `name`, matching preprocessor redefinition
    pub fn get(&self, name: &str) -> Option<&Define> {
        self.defines.iter().rev().find(|define| define.name == name)
    }

    /// `true` when `name` is defined at least once
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolve `name` to an integer, substituting aliases until a literal is
    /// reached.
    pub fn resolve(&self, name: &str) -> Result<i64> {
        let mut visited = HashSet::new();
        let mut current = name;
        loop {
            if !visited.insert(current) {
                return Err(RegisterMapError::AliasCycle {
                    name: name.to_string(),
                });
            }
            let define = self.get(current).ok_or_else(|| RegisterMapError::UnknownDefine {
                name: current.to_string(),
            })?;
            match &define.value {
                Some(DefineValue::Literal(value)) => return Ok(*value),
                Some(DefineValue::Alias(target)) => current = target,
                Some(DefineValue::Raw(text)) => {
                    return Err(RegisterMapError::Parse {
                        line: define.line,
                        reason: format!("value '{text}' of '{}' is not an integer", define.name),
                    })
                }
                None => {
                    return Err(RegisterMapError::Parse {
                        line: define.line,
                        reason: format!("'{}' has no value", define.name),
                    })
                }
            }
        }
    }
}
