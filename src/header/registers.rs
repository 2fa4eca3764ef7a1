// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register header reader
//!
//! A register header declares one `#define` per register. Only lines carrying
//! the doxygen `//<` marker take part:
//!
//! ```c
//! #define MY_DEFAULT_HREG             10    //< [0, 100000] Some description
//! //                                  10    //< lower part of uint32_t
//! //                                  11    //< higher part of uint32_t
//! ```
//!
//! The comment-only lines following a definition list the words it spans, so
//! the definition above covers two registers. The first bracketed `[...]` of
//! the description is a range when it contains a comma and a unit
//! otherwise. The address space comes from the register name suffix.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use super::defines::{parse_define_line, Define, DefineValue};
use crate::error::{RegisterMapError, Result};
use crate::modbus::{AddressSpace, RegisterDefinition, RegisterTable, TableMeta};

const DOC_MARKER: &str = "//<";
const META_LINES: usize = 10;

static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("bracket pattern is valid"));

static CONTINUATION_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*(\d+)").expect("continuation pattern is valid"));

enum DocLine<'a> {
    Define(Define),
    Continuation { line: usize, text: &'a str },
}

/// Parse the text of a register header into a table.
///
/// Names without a known suffix are skipped with a warning. The returned
/// table is not validated.
pub fn parse_register_header(contents: &str) -> Result<RegisterTable> {
    let doc_lines: Vec<DocLine> = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(DOC_MARKER))
        .map(|(index, line)| match parse_define_line(line, index + 1) {
            Some(define) => DocLine::Define(define),
            None => DocLine::Continuation {
                line: index + 1,
                text: line,
            },
        })
        .collect();

    let mut definitions = Vec::new();
    let mut seen_define = false;
    for (position, doc_line) in doc_lines.iter().enumerate() {
        let define = match doc_line {
            DocLine::Define(define) => define,
            DocLine::Continuation { line, .. } if !seen_define => {
                debug!("Ignoring documented line {line} before the first define");
                continue;
            }
            DocLine::Continuation { .. } => continue,
        };
        seen_define = true;

        let Some(space) = AddressSpace::from_register_name(&define.name) else {
            warn!(
                "Line {}: '{}' has no register suffix (_COIL, _HREG, _ISTS, _IREG), skipping",
                define.line, define.name
            );
            continue;
        };

        let offset = register_offset(define)?;
        let continuations: Vec<(usize, &str)> = doc_lines[position + 1..]
            .iter()
            .map_while(|doc_line| match doc_line {
                DocLine::Continuation { line, text } => Some((*line, *text)),
                DocLine::Define(_) => None,
            })
            .collect();
        check_continuation_offsets(define, offset, &continuations);

        let len = u16::try_from(continuations.len().max(1)).map_err(|_| RegisterMapError::Parse {
            line: define.line,
            reason: format!("'{}' spans too many registers", define.name),
        })?;

        let description = define.comment.clone().unwrap_or_default();
        let (unit, range) = split_brackets(&description);

        debug!(
            "Register {} in {} at {} (len {})",
            define.name, space, offset, len
        );
        definitions.push(
            RegisterDefinition::new(define.name.clone(), space, offset)
                .with_len(len)
                .with_unit(unit)
                .with_range(range)
                .with_description(description),
        );
    }

    Ok(RegisterTable::new(definitions).with_meta(parse_meta(contents)))
}

fn register_offset(define: &Define) -> Result<u16> {
    match &define.value {
        Some(DefineValue::Literal(value)) => {
            u16::try_from(*value).map_err(|_| RegisterMapError::ValueOutOfRange {
                name: define.name.clone(),
                value: *value,
                target: "a register offset (u16)",
            })
        }
        _ => Err(RegisterMapError::Parse {
            line: define.line,
            reason: format!("register '{}' needs an integer offset", define.name),
        }),
    }
}

/// Continuation lines usually repeat the offset they describe. A mismatch is
/// only worth a warning: the count is what defines the span.
fn check_continuation_offsets(define: &Define, offset: u16, continuations: &[(usize, &str)]) {
    for (index, (line, text)) in continuations.iter().enumerate() {
        let Some(found) = CONTINUATION_OFFSET
            .captures(text)
            .and_then(|captures| captures[1].parse::<u32>().ok())
        else {
            continue;
        };
        let expected = u32::from(offset) + index as u32;
        if found != expected {
            warn!(
                "Line {line}: continuation of '{}' names offset {found}, expected {expected}",
                define.name
            );
        }
    }
}

/// Split the first bracketed group of a description into (unit, range).
fn split_brackets(description: &str) -> (String, String) {
    match BRACKETS.captures(description) {
        Some(captures) if captures[1].contains(',') => (String::new(), captures[1].to_string()),
        Some(captures) => (captures[1].to_string(), String::new()),
        None => (String::new(), String::new()),
    }
}

/// Created/modified stamps from the comment block at the top of the header.
fn parse_meta(contents: &str) -> TableMeta {
    let mut meta = TableMeta::default();
    for line in contents.lines().take(META_LINES) {
        if let Some((_, date)) = line.split_once("Modified on ") {
            meta.modified = Some(date.trim().to_string());
        } else if line.contains("Created ") {
            if let Some((_, date)) = line.split_once(" on ") {
                meta.created = Some(date.trim().to_string());
            }
        }
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNIPPET: &str = "\
//  Created by someone on 01.02.2003
//  Modified on 04.05.2006
#define FIRST_COIL       3    //< [sec] with unit
#define WIDE_HREG        10   //< [0, 100000] wide one
//                       10   //< low
//                       11   //< high
#define NO_SUFFIX        7    //< not a register
#define SILENT_HREG      99
#define LAST_IREG        5    //< trailing
";

    #[test]
    fn test_parse_snippet() {
        let table = parse_register_header(SNIPPET).unwrap();
        let names: Vec<&str> = table.iter().map(|def| def.name()).collect();
        assert_eq!(names, ["FIRST_COIL", "WIDE_HREG", "LAST_IREG"]);

        let coil = table.lookup("FIRST_COIL").unwrap();
        assert_eq!(coil.space, AddressSpace::Coil);
        assert_eq!(coil.unit(), Some("sec"));
        assert_eq!(coil.range, "");
        assert_eq!(coil.description, "[sec] with unit");

        let wide = table.lookup("WIDE_HREG").unwrap();
        assert_eq!(wide.len, 2);
        assert_eq!(wide.range, "0, 100000");
        assert_eq!(wide.unit(), None);

        assert_eq!(table.lookup("LAST_IREG").unwrap().len, 1);
        assert!(table.lookup("SILENT_HREG").is_none());

        assert_eq!(table.meta().created.as_deref(), Some("01.02.2003"));
        assert_eq!(table.meta().modified.as_deref(), Some("04.05.2006"));
    }

    #[test]
    fn test_offset_must_fit_and_be_literal() {
        let too_big = parse_register_header("#define BIG_HREG 70000 //< too far\n");
        assert!(matches!(
            too_big,
            Err(RegisterMapError::ValueOutOfRange { value: 70000, .. })
        ));

        let alias = parse_register_header("#define ALIASED_HREG OTHER //< alias\n");
        assert!(matches!(alias, Err(RegisterMapError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_continuation_count_wins_over_named_offset() {
        let header = "\
#define MISNUMBERED_HREG   20   //< [0, 70000] pair with stale comments
//                         30   //< low
//                         31   //< high
#define NEXT_HREG          22   //< follows the pair
";
        let table = parse_register_header(header).unwrap();

        let pair = table.lookup("MISNUMBERED_HREG").unwrap();
        assert_eq!(pair.offset, 20);
        assert_eq!(pair.len, 2);
        assert_eq!(pair.span(), 20..22);
        assert_eq!(table.lookup("NEXT_HREG").unwrap().len, 1);
    }

    #[test]
    fn test_split_brackets() {
        assert_eq!(split_brackets("[volt] x"), ("volt".to_string(), String::new()));
        assert_eq!(split_brackets("[1, 2] x [V]"), (String::new(), "1, 2".to_string()));
        assert_eq!(split_brackets("plain"), (String::new(), String::new()));
    }
}
