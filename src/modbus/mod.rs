// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Modbus register address table
//!
//! This module maps symbolic register names to offsets in the four Modbus
//! address spaces, so that a Modbus server knows where to expose each value
//! and with which access mode and value domain. It does not speak the
//! protocol itself.
//!
//! ## Key Components
//!
//! - `AddressSpace`: the four numbering domains with their access mode,
//!   value domain and function codes.
//! - `RegisterDefinition`: a name bound to an offset (and optional span).
//! - `RegisterTable`: the queryable, validated collection of definitions.
//! - `WordOrder`: how 32-bit values are split across two registers.
//!
//! ## Register Map of the example firmware
//!
//! ### Coils (Read/Write, [0, 1])
//!
//! | Offset | Name | Description |
//! |--------|------|-------------|
//! | 10 | SOME_EXAMPLE_COIL | Description of coil |
//! | 11 | OTHER_TESTING_COIL | Description with seconds as unit |
//!
//! ### Holding Registers (Read/Write, [0, 65535])
//!
//! | Offset | Name | Unit | Description |
//! |--------|------|------|-------------|
//! | 10-11 | MY_DEFAULT_HREG | - | 32-bit value, expected range 0 to 100000 |
//! | 210 | SECOND_REG_HREG | volt | Another holding register |
//!
//! ### Discrete Inputs (Read-Only, [0, 1])
//!
//! | Offset | Name | Description |
//! |--------|------|-------------|
//! | 10 | SSR_STATE_ISTS | State of the SSR |
//! | 11 | ENABLE_BUTTON_STATE_ISTS | State of the enable button |
//!
//! ### Input Registers (Read-Only, [0, 65535])
//!
//! | Offset | Name | Unit | Description |
//! |--------|------|------|-------------|
//! | 10-11 | LOOP_TIME_US_IREG | us | Time for one loop cycle, 32-bit |
//! | 12-13 | UPTIME_MS_IREG | ms | System uptime, 32-bit |
//!
//! ## Usage
//!
//! ```
//! use modbus_register_map::modbus::{AddressSpace, RegisterTable, WordOrder};
//!
//! let table = RegisterTable::firmware();
//! let uptime = table.lookup("UPTIME_MS_IREG").unwrap();
//! assert_eq!(uptime.space, AddressSpace::InputRegister);
//! assert_eq!(uptime.wide_pair(WordOrder::LowWordFirst), Some((12, 13)));
//! ```

pub mod address_space;
pub mod document;
pub mod firmware;
pub mod register;
pub mod table;
pub mod wide;

pub use address_space::{Access, AddressSpace, ValueDomain};
pub use firmware::{coils, discrete_inputs, holding_registers, input_registers, FIRMWARE_REGISTERS};
pub use register::RegisterDefinition;
pub use table::{RegisterTable, TableMeta, ValidationIssue};
pub use wide::WordOrder;
