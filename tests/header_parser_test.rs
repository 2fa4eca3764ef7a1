// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use modbus_register_map::export;
use modbus_register_map::header::parse_register_header;
use modbus_register_map::modbus::{AddressSpace, RegisterTable};
use modbus_register_map::RegisterMapError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("resources")
        .join(name)
}

#[test]
fn test_header_matches_builtin_table() -> Result<()> {
    let table = RegisterTable::load(resource("modbusRegisters.h"))?;
    assert_eq!(table, RegisterTable::firmware());
    assert!(table.validate().is_empty());
    Ok(())
}

#[test]
fn test_header_meta_and_spans() -> Result<()> {
    let table = RegisterTable::load(resource("modbusRegisters.h"))?;

    assert_eq!(table.meta().created.as_deref(), Some("24.07.2021"));
    assert_eq!(table.meta().modified.as_deref(), Some("24.07.2021"));

    let spans: Vec<(&str, u16)> = table.iter().map(|def| (def.name(), def.len)).collect();
    assert_eq!(
        spans,
        [
            ("SOME_EXAMPLE_COIL", 1),
            ("OTHER_TESTING_COIL", 1),
            ("MY_DEFAULT_HREG", 2),
            ("SECOND_REG_HREG", 1),
            ("SSR_STATE_ISTS", 1),
            ("ENABLE_BUTTON_STATE_ISTS", 1),
            ("LOOP_TIME_US_IREG", 2),
            ("UPTIME_MS_IREG", 2),
        ]
    );

    let hreg = table.lookup("MY_DEFAULT_HREG").unwrap();
    assert_eq!(hreg.range, "0, 100000");
    assert_eq!(hreg.unit(), None);
    let volt = table.lookup("SECOND_REG_HREG").unwrap();
    assert_eq!(volt.unit(), Some("volt"));
    assert_eq!(volt.description, "[volt] Another holding register");
    Ok(())
}

#[test]
fn test_json_document_layout() -> Result<()> {
    let json: serde_json::Value = serde_json::from_str(&RegisterTable::firmware().to_json(true)?)?;

    assert_eq!(
        json["COILS"]["SOME_EXAMPLE_COIL"],
        serde_json::json!({
            "register": 10,
            "len": 1,
            "description": "Description of coil",
            "range": "",
            "unit": ""
        })
    );
    assert_eq!(json["HREGS"]["MY_DEFAULT_HREG"]["len"], 2);
    assert_eq!(json["HREGS"]["MY_DEFAULT_HREG"]["range"], "0, 100000");
    assert_eq!(json["IREGS"]["UPTIME_MS_IREG"]["unit"], "ms");
    assert_eq!(json["ISTS"].as_object().map(|s| s.len()), Some(2));
    assert_eq!(json["META"]["created"], "24.07.2021");
    Ok(())
}

#[test]
fn test_export_and_reload_json_and_yaml() -> Result<()> {
    let temp_dir = tempdir()?;
    let header = temp_dir.path().join("modbusRegisters.h");
    fs::copy(resource("modbusRegisters.h"), &header)?;

    let table = RegisterTable::load(&header)?;
    let json_path = export::resolve_output_path(None, Some(&header));
    assert_eq!(json_path, temp_dir.path().join("registers.json"));
    export::write_json(&table, &json_path, false)?;
    assert_eq!(RegisterTable::load(&json_path)?, table);

    let yaml_path = temp_dir.path().join("registers.yaml");
    fs::write(&yaml_path, table.to_yaml()?)?;
    assert_eq!(RegisterTable::load(&yaml_path)?, table);
    Ok(())
}

#[test]
fn test_hand_written_document_loads() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("map.json");
    fs::write(
        &path,
        r#"{
  "HREGS": { "SETPOINT_HREG": { "register": 100, "unit": "degC" } },
  "COILS": { "PUMP_COIL": { "register": 0 } }
}"#,
    )?;

    let table = RegisterTable::load(&path)?;
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.at(AddressSpace::HoldingRegister, 100).map(|def| def.name()),
        Some("SETPOINT_HREG")
    );
    // sections are read in address space order, not file order
    assert_eq!(table.iter().next().map(|def| def.name()), Some("PUMP_COIL"));
    Ok(())
}

#[test]
fn test_load_errors() -> Result<()> {
    let temp_dir = tempdir()?;

    let csv = temp_dir.path().join("map.csv");
    fs::write(&csv, "name,offset\n")?;
    assert!(matches!(
        RegisterTable::load(&csv),
        Err(RegisterMapError::UnsupportedFormat { .. })
    ));

    assert!(matches!(
        RegisterTable::load(temp_dir.path().join("missing.h")),
        Err(RegisterMapError::Io { .. })
    ));

    let broken = temp_dir.path().join("broken.json");
    fs::write(&broken, "{ \"COILS\": { \"X_COIL\": { } } }")?;
    assert!(matches!(
        RegisterTable::load(&broken),
        Err(RegisterMapError::Json(_))
    ));
    Ok(())
}

#[test]
fn test_parse_header_without_registers() -> Result<()> {
    let table = parse_register_header("#ifndef guard_h\n#define guard_h\n#endif\n")?;
    assert!(table.is_empty());
    assert_eq!(table.meta().created, None);
    Ok(())
}
