// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Writing register documents to disk

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::modbus::RegisterTable;

/// File name used when only a directory is known
pub const DEFAULT_FILE_NAME: &str = "registers.json";

/// Decide where a JSON register document goes.
///
/// - an existing directory receives `registers.json`
/// - a `.json` path is used as given
/// - any other extension is replaced by `.json`
/// - without an output, the document lands next to `input`, or in the
///   working directory when there is no input file
pub fn resolve_output_path(output: Option<&Path>, input: Option<&Path>) -> PathBuf {
    let Some(output) = output else {
        let directory = input
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        return directory.join(DEFAULT_FILE_NAME);
    };

    if output.is_dir() {
        return output.join(DEFAULT_FILE_NAME);
    }

    match output.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => output.to_path_buf(),
        Some(ext) => {
            let replaced = output.with_extension("json");
            warn!(
                "Output file extension '.{}' is not '.json', writing to {:?} instead",
                ext, replaced
            );
            replaced
        }
        None => output.with_extension("json"),
    }
}

/// Save `table` as a JSON register document.
pub fn write_json(table: &RegisterTable, path: &Path, pretty: bool) -> Result<()> {
    let json = table.to_json(pretty)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write register document to: {:?}", path))?;
    file.write_all(b"\n")?;

    info!("Register document with {} entries saved to {:?}", table.len(), path);
    Ok(())
}
