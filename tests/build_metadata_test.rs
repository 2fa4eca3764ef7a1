// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use chrono::NaiveDate;
use modbus_register_map::build_info::{
    decode_commit_sha, encode_commit_sha, vcs, BuildMetadata, Version, VersionCodePolicy,
};
use modbus_register_map::header::{DefineTable, DefineValue};
use modbus_register_map::RegisterMapError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn vcs_header() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/vcsInfo.h")
}

#[test]
fn test_sw_version_alias_resolves() -> Result<()> {
    let defines = DefineTable::parse(&fs::read_to_string(vcs_header())?);

    assert_eq!(
        defines.get("SW_VERSION").and_then(|d| d.value.clone()),
        Some(DefineValue::Alias("CURRENT_FIRMWARE_VERSION".to_string()))
    );
    assert_eq!(defines.resolve("SW_VERSION")?, 191);
    assert_eq!(i64::from(vcs::SW_VERSION), defines.resolve("CURRENT_FIRMWARE_VERSION")?);

    // the include guard has no value
    assert_eq!(defines.get("vcsInfo_h").map(|d| d.value.is_none()), Some(true));
    Ok(())
}

#[test]
fn test_header_matches_builtin_metadata() -> Result<()> {
    let metadata = BuildMetadata::from_header(vcs_header())?;
    assert_eq!(metadata, BuildMetadata::FIRMWARE);
    assert_eq!(metadata.software, Version::new(1, 9, 1));
    assert_eq!(metadata.commit_sha_fragments(), [25651, 12857, 14389, 14384]);
    Ok(())
}

#[test]
fn test_commit_sha_reconstruction() -> Result<()> {
    let metadata = BuildMetadata::FIRMWARE;
    assert_eq!(metadata.commit_sha()?, "d3298580");
    assert_eq!(encode_commit_sha("d3298580")?, metadata.commit_sha);
    assert_eq!(decode_commit_sha(&encode_commit_sha("0a1b")?)?, "0a1b");
    Ok(())
}

#[test]
fn test_dates() {
    let metadata = BuildMetadata::FIRMWARE;
    assert_eq!(metadata.creation_date(), NaiveDate::from_ymd_opt(2021, 7, 24));
    assert_eq!(metadata.anniversary_date(), NaiveDate::from_ymd_opt(2018, 3, 26));
}

#[test]
fn test_version_code() {
    let metadata = BuildMetadata::FIRMWARE;
    assert_eq!(metadata.derived_version_code(), 191);
    assert!(metadata.version_code_matches());
    assert_eq!(metadata.effective_version_code(VersionCodePolicy::Literal), 191);
    assert_eq!(metadata.effective_version_code(VersionCodePolicy::Derived), 191);
}

#[test]
fn test_full_info_report() {
    let info = BuildMetadata::FIRMWARE.full_info();
    assert!(info.contains("Firmware Version: 191"));
    assert!(info.contains("Software Version: 1.9.1 (code 191)"));
    assert!(info.contains("Created: 2021-07-24"));
    assert!(info.contains("Commit: d3298580"));
    assert!(info.contains("Anniversary: 2018-03-26"));
}

#[test]
fn test_header_errors() -> Result<()> {
    let temp_dir = tempdir()?;
    let valid = fs::read_to_string(vcs_header())?;

    // SW_VERSION pointing somewhere else
    let mismatched = temp_dir.path().join("mismatch.h");
    fs::write(
        &mismatched,
        format!("{valid}\n#define OTHER_VERSION 200\n#undef SW_VERSION\n#define SW_VERSION OTHER_VERSION\n"),
    )?;
    assert!(matches!(
        BuildMetadata::from_header(&mismatched),
        Err(RegisterMapError::AliasMismatch { found: 200, expected: 191, .. })
    ));

    let missing = temp_dir.path().join("missing.h");
    fs::write(&missing, valid.replace("COMMIT_SHA_IV", "COMMIT_SHA_V"))?;
    assert!(matches!(
        BuildMetadata::from_header(&missing),
        Err(RegisterMapError::MissingDefine { name }) if name == "COMMIT_SHA_IV"
    ));

    let too_big = temp_dir.path().join("too_big.h");
    fs::write(&too_big, valid.replace("25651", "70000"))?;
    assert!(matches!(
        BuildMetadata::from_header(&too_big),
        Err(RegisterMapError::ValueOutOfRange { value: 70000, .. })
    ));
    Ok(())
}

#[test]
fn test_drifted_version_still_loads() -> Result<()> {
    let temp_dir = tempdir()?;
    let drifted = temp_dir.path().join("drifted.h");
    let header = fs::read_to_string(vcs_header())?.replace(
        "#define PATCH_SW_VERSION    1",
        "#define PATCH_SW_VERSION    2",
    );
    fs::write(&drifted, header)?;

    let metadata = BuildMetadata::from_header(&drifted)?;
    assert!(!metadata.version_code_matches());
    assert_eq!(metadata.effective_version_code(VersionCodePolicy::Literal), 191);
    assert_eq!(metadata.effective_version_code(VersionCodePolicy::Derived), 192);
    Ok(())
}
