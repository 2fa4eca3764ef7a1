// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Command line front end of the register map library
use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use modbus_register_map::build_info::VersionCodePolicy;
use modbus_register_map::config::{self, Config};
use modbus_register_map::export;
use modbus_register_map::modbus::{AddressSpace, RegisterDefinition, RegisterTable, WordOrder};

/// Inspect, validate and export Modbus register maps and firmware build metadata
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Register header (.h) or register document (.json, .yaml)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Word order of 32-bit register pairs (low_word_first or high_word_first)
    #[arg(long)]
    word_order: Option<WordOrder>,

    /// Only log validation issues instead of failing
    #[arg(long)]
    no_strict: bool,

    /// Describe the named register and exit
    #[arg(long, value_name = "NAME")]
    lookup: Vec<String>,

    /// Write the register table as a JSON document
    #[arg(short, long)]
    export: bool,

    /// Output file or directory of the JSON document (implies --export)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write compact JSON instead of indented JSON
    #[arg(long)]
    compact: bool,

    /// Print the JSON register document to stdout
    #[arg(long)]
    print: bool,

    /// Show the firmware build metadata and exit
    #[arg(long)]
    build_info: bool,

    /// Build metadata header (vcsInfo.h) used by --build-info
    #[arg(long)]
    build_header: Option<PathBuf>,

    /// Report the version code derived from major, minor and patch
    #[arg(long)]
    derive_version_code: bool,

    /// Path to configuration file (YAML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a configuration to validate and exit
    #[arg(long)]
    validate_config: Option<PathBuf>,

    /// Output the configuration schema as JSON and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if args.show_config_schema {
        return config::output_config_schema();
    }

    if let Some(validate_path) = args.validate_config {
        if !validate_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file does not exist: {}",
                validate_path.display()
            ));
        }

        Config::from_file(&validate_path)
            .map_err(|err| anyhow::anyhow!("Configuration validation failed: {}", err))?;
        println!("Configuration file is valid: {}", validate_path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    config.apply_args(
        args.input.clone(),
        args.word_order,
        args.no_strict.then_some(false),
        args.build_header.clone(),
        args.derive_version_code.then_some(VersionCodePolicy::Derived),
        args.output.clone(),
        args.compact.then_some(false),
    );

    if args.build_info {
        let metadata = config.build.load_metadata()?;
        println!("{}", metadata.full_info());
        println!(
            "Reported Version Code: {} ({:?})",
            metadata.effective_version_code(config.build.version_code),
            config.build.version_code
        );
        if !metadata.version_code_matches() {
            warn!(
                "Declared firmware version {} differs from derived code {}",
                metadata.firmware_version,
                metadata.derived_version_code()
            );
        }
        return Ok(());
    }

    let table = config.registers.load_table()?;
    info!("Loaded register table with {} entries", table.len());

    let issues = table.validate();
    if !issues.is_empty() {
        if config.registers.strict {
            return Err(modbus_register_map::RegisterMapError::Invalid(issues).into());
        }
        for issue in &issues {
            warn!("{}", issue);
        }
    }

    let order = config.registers.word_order;

    if !args.lookup.is_empty() {
        for name in &args.lookup {
            match table.lookup(name) {
                Some(def) => println!("{}", describe(def, order)),
                None => anyhow::bail!("No register named '{}'", name),
            }
        }
        return Ok(());
    }

    let exporting = args.export || config.export.output.is_some();
    if exporting {
        let path = export::resolve_output_path(
            config.export.output.as_deref(),
            config.registers.source.as_deref(),
        );
        export::write_json(&table, &path, config.export.pretty)?;
    }

    // the listing is only the fallback when no document was asked for
    if args.print {
        println!("{}", table.to_json(config.export.pretty)?);
    } else if !exporting {
        print_table(&table, order);
    }
    Ok(())
}

fn describe(def: &RegisterDefinition, order: WordOrder) -> String {
    let mut lines = vec![
        def.to_string(),
        format!("  access:      {:?}", def.access()),
        format!("  domain:      {}", def.value_domain()),
        format!("  read:        FC 0x{:02X}", def.space.read_function_code()),
    ];
    if let Some((single, multiple)) = def.space.write_function_codes() {
        lines.push(format!(
            "  write:       FC 0x{:02X} / 0x{:02X}",
            single, multiple
        ));
    }
    if let Some((low, high)) = def.wide_pair(order) {
        lines.push(format!("  32-bit pair: low {low}, high {high} ({order})"));
    }
    if let Some(unit) = def.unit() {
        lines.push(format!("  unit:        {unit}"));
    }
    if !def.range.is_empty() {
        lines.push(format!("  range:       [{}]", def.range));
    }
    if !def.description.is_empty() {
        lines.push(format!("  description: {}", def.description));
    }
    lines.join("\n")
}

fn print_table(table: &RegisterTable, order: WordOrder) {
    for space in AddressSpace::ALL {
        println!(
            "{} ({:?}, {})",
            space.section_key(),
            space.access(),
            space.element_domain()
        );
        for def in table.in_space(space) {
            let offsets = match def.wide_pair(order) {
                Some((low, high)) => format!("{low}/{high}"),
                None if def.len > 1 => format!("{}+{}", def.offset, def.len),
                None => def.offset.to_string(),
            };
            println!(
                "  {:>9}  {:<28} {:<6} {}",
                offsets,
                def.name(),
                def.unit().unwrap_or("-"),
                def.description
            );
        }
    }
}
