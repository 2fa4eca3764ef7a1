// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! The four independent Modbus numbering domains
//!
//! Modbus uses the terms "coil", "holding register", "discrete input" and
//! "input register" for four address spaces that are numbered separately.
//! Offset 10 in the coil space has nothing to do with offset 10 in the
//! holding register space.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access mode a server grants on an address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Clients may read and write (setter + getter)
    ReadWrite,
    /// Clients may only read (getter)
    ReadOnly,
}

/// Inclusive value range of a single element or of a whole definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDomain {
    pub min: u32,
    pub max: u32,
}

impl ValueDomain {
    /// A single bit, values {0, 1}
    pub const BIT: ValueDomain = ValueDomain { min: 0, max: 1 };
    /// A 16-bit unsigned register, values [0, 65535]
    pub const WORD: ValueDomain = ValueDomain {
        min: 0,
        max: u16::MAX as u32,
    };
    /// A 32-bit unsigned value stored in two registers
    pub const DOUBLE_WORD: ValueDomain = ValueDomain {
        min: 0,
        max: u32::MAX,
    };

    /// `true` when `min <= value <= max`
    pub fn contains(&self, value: i64) -> bool {
        value >= i64::from(self.min) && value <= i64::from(self.max)
    }
}

impl fmt::Display for ValueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// One of the four Modbus address spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSpace {
    /// Outputs (COILS), read/write single bits
    Coil,
    /// Holding registers (HREGS), read/write 16-bit words
    HoldingRegister,
    /// Inputs (ISTS), read-only single bits
    DiscreteInput,
    /// Input registers (IREGS), read-only 16-bit words
    InputRegister,
}

impl AddressSpace {
    /// All spaces in the order they appear in register headers and documents
    pub const ALL: [AddressSpace; 4] = [
        AddressSpace::Coil,
        AddressSpace::HoldingRegister,
        AddressSpace::DiscreteInput,
        AddressSpace::InputRegister,
    ];

    /// Access mode a Modbus master has on this space.
    ///
    /// # Returns
    ///
    /// `ReadWrite` for coils and holding registers, `ReadOnly` for discrete
    /// inputs and input registers
    pub const fn access(self) -> Access {
        match self {
            AddressSpace::Coil | AddressSpace::HoldingRegister => Access::ReadWrite,
            AddressSpace::DiscreteInput | AddressSpace::InputRegister => Access::ReadOnly,
        }
    }

    /// `true` when a master may write to this space
    pub const fn is_writable(self) -> bool {
        matches!(self.access(), Access::ReadWrite)
    }

    /// `true` for the single-bit spaces (coils and discrete inputs)
    pub const fn is_bit(self) -> bool {
        matches!(self, AddressSpace::Coil | AddressSpace::DiscreteInput)
    }

    /// Value domain of one element (one offset) of this space
    pub const fn element_domain(self) -> ValueDomain {
        if self.is_bit() {
            ValueDomain::BIT
        } else {
            ValueDomain::WORD
        }
    }

    /// Key of this space in the JSON register document
    pub const fn section_key(self) -> &'static str {
        match self {
            AddressSpace::Coil => "COILS",
            AddressSpace::HoldingRegister => "HREGS",
            AddressSpace::DiscreteInput => "ISTS",
            AddressSpace::InputRegister => "IREGS",
        }
    }

    /// Suffix register names of this space carry in headers
    pub const fn name_suffix(self) -> &'static str {
        match self {
            AddressSpace::Coil => "_COIL",
            AddressSpace::HoldingRegister => "_HREG",
            AddressSpace::DiscreteInput => "_ISTS",
            AddressSpace::InputRegister => "_IREG",
        }
    }

    /// Find the space a register name belongs to from its suffix.
    pub fn from_register_name(name: &str) -> Option<AddressSpace> {
        AddressSpace::ALL
            .into_iter()
            .find(|space| name.ends_with(space.name_suffix()))
    }

    /// Modbus function code used to read this space
    ///
    /// - 0x01: Read Coils
    /// - 0x02: Read Discrete Inputs
    /// - 0x03: Read Holding Registers
    /// - 0x04: Read Input Registers
    pub const fn read_function_code(self) -> u8 {
        match self {
            AddressSpace::Coil => 0x01,
            AddressSpace::DiscreteInput => 0x02,
            AddressSpace::HoldingRegister => 0x03,
            AddressSpace::InputRegister => 0x04,
        }
    }

    /// Function codes for single and multiple writes, `None` for read-only spaces
    ///
    /// - 0x05 / 0x0F: Write Single Coil / Write Multiple Coils
    /// - 0x06 / 0x10: Write Single Register / Write Multiple Registers
    pub const fn write_function_codes(self) -> Option<(u8, u8)> {
        match self {
            AddressSpace::Coil => Some((0x05, 0x0F)),
            AddressSpace::HoldingRegister => Some((0x06, 0x10)),
            AddressSpace::DiscreteInput | AddressSpace::InputRegister => None,
        }
    }

    /// Inverse of [`AddressSpace::section_key`], e.g. `"HREGS"`
    pub fn from_section_key(key: &str) -> Option<AddressSpace> {
        AddressSpace::ALL
            .into_iter()
            .find(|space| space.section_key() == key)
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressSpace::Coil => "coil",
            AddressSpace::HoldingRegister => "holding register",
            AddressSpace::DiscreteInput => "discrete input",
            AddressSpace::InputRegister => "input register",
        };
        f.write_str(name)
    }
}
