// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! C header readers
//!
//! Firmware projects keep their register map and their build metadata as
//! `#define` constants in C headers. [`defines`] reads the raw constants and
//! resolves aliases between them, [`registers`] turns a documented register
//! header into a [`RegisterTable`](crate::modbus::RegisterTable).

pub mod defines;
pub mod registers;

pub use defines::{parse_define_line, Define, DefineTable, DefineValue};
pub use registers::parse_register_header;
