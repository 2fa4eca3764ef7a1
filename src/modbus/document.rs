// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Structured register document
//!
//! The table is stored as one object per address space keyed by register
//! name, plus a `META` object:
//!
//! ```json
//! {
//!   "COILS": { "SOME_EXAMPLE_COIL": { "register": 10, "len": 1, "description": "...", "range": "", "unit": "" } },
//!   "HREGS": { },
//!   "ISTS": { },
//!   "IREGS": { },
//!   "META": { "created": "24.07.2021", "modified": "24.07.2021" }
//! }
//! ```
//!
//! Registers keep their declaration order in both directions, so a document
//! reads in the same order as the header it was generated from.

use std::borrow::Cow;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::address_space::AddressSpace;
use super::register::RegisterDefinition;
use super::table::{RegisterTable, TableMeta};
use crate::error::Result;

#[derive(Serialize)]
struct EntryRef<'a> {
    register: u16,
    len: u16,
    description: &'a str,
    range: &'a str,
    unit: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<i64>,
}

#[derive(Deserialize)]
struct Entry {
    register: u16,
    #[serde(default = "default_len")]
    len: u16,
    #[serde(default)]
    description: String,
    #[serde(default)]
    range: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    test: Option<i64>,
}

fn default_len() -> u16 {
    1
}

struct SectionRef<'a> {
    table: &'a RegisterTable,
    space: AddressSpace,
}

impl Serialize for SectionRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.count(self.space)))?;
        for def in self.table.in_space(self.space) {
            map.serialize_entry(
                &*def.name,
                &EntryRef {
                    register: def.offset,
                    len: def.len,
                    description: &def.description,
                    range: &def.range,
                    unit: &def.unit,
                    test: def.test,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for RegisterTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(AddressSpace::ALL.len() + 1))?;
        for space in AddressSpace::ALL {
            map.serialize_entry(space.section_key(), &SectionRef { table: self, space })?;
        }
        map.serialize_entry("META", self.meta())?;
        map.end()
    }
}

/// Entries of one section in document order
#[derive(Default)]
struct Section(Vec<(String, Entry)>);

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SectionVisitor;

        impl<'de> Visitor<'de> for SectionVisitor {
            type Value = Section;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of register names to register entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Section, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, entry)) = access.next_entry::<String, Entry>()? {
                    entries.push((name, entry));
                }
                Ok(Section(entries))
            }
        }

        deserializer.deserialize_map(SectionVisitor)
    }
}

#[derive(Deserialize)]
struct Document {
    #[serde(rename = "COILS", default)]
    coils: Section,
    #[serde(rename = "HREGS", default)]
    hregs: Section,
    #[serde(rename = "ISTS", default)]
    ists: Section,
    #[serde(rename = "IREGS", default)]
    iregs: Section,
    #[serde(rename = "META", default)]
    meta: TableMeta,
}

impl From<Document> for RegisterTable {
    fn from(document: Document) -> Self {
        let sections = [
            (AddressSpace::Coil, document.coils),
            (AddressSpace::HoldingRegister, document.hregs),
            (AddressSpace::DiscreteInput, document.ists),
            (AddressSpace::InputRegister, document.iregs),
        ];
        let definitions = sections
            .into_iter()
            .flat_map(|(space, section)| {
                section.0.into_iter().map(move |(name, entry)| RegisterDefinition {
                    name: Cow::Owned(name),
                    space,
                    offset: entry.register,
                    len: entry.len,
                    unit: Cow::Owned(entry.unit),
                    range: Cow::Owned(entry.range),
                    description: Cow::Owned(entry.description),
                    test: entry.test,
                })
            })
            .collect();
        RegisterTable::new(definitions).with_meta(document.meta)
    }
}

impl<'de> Deserialize<'de> for RegisterTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Document::deserialize(deserializer).map(RegisterTable::from)
    }
}

impl RegisterTable {
    /// Render the table as a JSON register document.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Render the table as a YAML register document.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_keeps_declaration_order() -> anyhow::Result<()> {
        let table = RegisterTable::new(vec![
            RegisterDefinition::new("ZULU_HREG", AddressSpace::HoldingRegister, 1),
            RegisterDefinition::new("ALPHA_HREG", AddressSpace::HoldingRegister, 2),
        ]);
        let json = table.to_json(false)?;
        let zulu = json.find("ZULU_HREG").unwrap();
        let alpha = json.find("ALPHA_HREG").unwrap();
        assert!(zulu < alpha, "document reordered registers: {json}");

        let loaded: RegisterTable = serde_json::from_str(&json)?;
        let names: Vec<&str> = loaded.iter().map(|def| def.name()).collect();
        assert_eq!(names, ["ZULU_HREG", "ALPHA_HREG"]);
        Ok(())
    }

    #[test]
    fn test_missing_sections_and_fields_default() -> anyhow::Result<()> {
        let table: RegisterTable =
            serde_json::from_str(r#"{"IREGS": {"LOOP_TIME_US_IREG": {"register": 10}}}"#)?;
        assert_eq!(table.len(), 1);
        let def = table.lookup("LOOP_TIME_US_IREG").unwrap();
        assert_eq!(def.space, AddressSpace::InputRegister);
        assert_eq!(def.len, 1);
        assert_eq!(def.unit(), None);
        assert_eq!(table.meta(), &TableMeta::default());
        Ok(())
    }

    #[test]
    fn test_expected_test_value_survives_reload() -> anyhow::Result<()> {
        let table: RegisterTable = serde_json::from_str(
            r#"{"HREGS": {"MY_DEFAULT_HREG": {"register": 10, "len": 2, "test": 1234}},
                "COILS": {"SOME_EXAMPLE_COIL": {"register": 10, "test": -1, "extra": true}}}"#,
        )?;
        assert_eq!(table.lookup("MY_DEFAULT_HREG").and_then(|d| d.test), Some(1234));
        assert_eq!(table.lookup("SOME_EXAMPLE_COIL").and_then(|d| d.test), Some(-1));

        let json: serde_json::Value = serde_json::from_str(&table.to_json(false)?)?;
        assert_eq!(json["HREGS"]["MY_DEFAULT_HREG"]["test"], 1234);
        assert_eq!(json["COILS"]["SOME_EXAMPLE_COIL"]["test"], -1);
        assert!(json["COILS"]["SOME_EXAMPLE_COIL"].get("extra").is_none());

        let reloaded: RegisterTable = serde_json::from_value(json)?;
        assert_eq!(reloaded, table);
        Ok(())
    }

    #[test]
    fn test_missing_test_value_is_not_written() -> anyhow::Result<()> {
        let json = RegisterTable::firmware().to_json(false)?;
        assert!(!json.contains("\"test\""), "unexpected test key: {json}");
        Ok(())
    }
}
