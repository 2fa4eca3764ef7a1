// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Modbus register map library
//!
//! This library describes where a firmware exposes its values on a Modbus
//! device and which build it is:
//!
//! - [`modbus`]: the register address table over the four Modbus address
//!   spaces, its validation and its JSON/YAML document form
//! - [`build_info`]: firmware version, creation date and packed commit hash
//! - [`header`]: readers for the C headers both tables are declared in
//! - [`export`]: writing register documents
//! - [`config`]: YAML configuration of the `register-map` tool
//!
//! The Modbus protocol itself is left to the server or client using the table.

pub mod build_info;
pub mod config;
pub mod error;
pub mod export;
pub mod header;
pub mod modbus;

pub use build_info::BuildMetadata;
pub use error::{RegisterMapError, Result};
pub use modbus::{AddressSpace, RegisterDefinition, RegisterTable, WordOrder};
