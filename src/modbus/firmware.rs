// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register map of the example firmware
//!
//! The offsets are available both as plain constants grouped per address
//! space and as the documented [`FIRMWARE_REGISTERS`] table.

use super::address_space::AddressSpace;
use super::register::RegisterDefinition;
use super::table::{RegisterTable, TableMeta};

/// Outputs (COILS), setter + getter, [0, 1]
pub mod coils {
    pub const SOME_EXAMPLE_COIL: u16 = 10;
    /// [sec]
    pub const OTHER_TESTING_COIL: u16 = 11;
}

/// Holding registers (HREGS), setter + getter, [0, 65535]
pub mod holding_registers {
    /// 32-bit value, lower part at 10, higher part at 11
    pub const MY_DEFAULT_HREG: u16 = 10;
    /// [volt]
    pub const SECOND_REG_HREG: u16 = 210;
}

/// Inputs (ISTS), getter, [0, 1]
pub mod discrete_inputs {
    pub const SSR_STATE_ISTS: u16 = 10;
    pub const ENABLE_BUTTON_STATE_ISTS: u16 = 11;
}

/// Input registers (IREGS), getter, [0, 65535]
pub mod input_registers {
    /// [us] 32-bit value, lower part at 10, higher part at 11
    pub const LOOP_TIME_US_IREG: u16 = 10;
    /// [ms] 32-bit value, lower part at 12, higher part at 13
    pub const UPTIME_MS_IREG: u16 = 12;
}

pub const FIRMWARE_REGISTERS: [RegisterDefinition; 8] = [
    RegisterDefinition::documented(
        "SOME_EXAMPLE_COIL",
        AddressSpace::Coil,
        coils::SOME_EXAMPLE_COIL,
        1,
        "",
        "",
        "Description of coil",
    ),
    RegisterDefinition::documented(
        "OTHER_TESTING_COIL",
        AddressSpace::Coil,
        coils::OTHER_TESTING_COIL,
        1,
        "sec",
        "",
        "[sec] Description with seconds as unit",
    ),
    RegisterDefinition::documented(
        "MY_DEFAULT_HREG",
        AddressSpace::HoldingRegister,
        holding_registers::MY_DEFAULT_HREG,
        2,
        "",
        "0, 100000",
        "[0, 100000] Some description of this HREG with an expected range from 0 to 100.000",
    ),
    RegisterDefinition::documented(
        "SECOND_REG_HREG",
        AddressSpace::HoldingRegister,
        holding_registers::SECOND_REG_HREG,
        1,
        "volt",
        "",
        "[volt] Another holding register",
    ),
    RegisterDefinition::documented(
        "SSR_STATE_ISTS",
        AddressSpace::DiscreteInput,
        discrete_inputs::SSR_STATE_ISTS,
        1,
        "",
        "",
        "state of the SSR",
    ),
    RegisterDefinition::documented(
        "ENABLE_BUTTON_STATE_ISTS",
        AddressSpace::DiscreteInput,
        discrete_inputs::ENABLE_BUTTON_STATE_ISTS,
        1,
        "",
        "",
        "state of the enable button",
    ),
    RegisterDefinition::documented(
        "LOOP_TIME_US_IREG",
        AddressSpace::InputRegister,
        input_registers::LOOP_TIME_US_IREG,
        2,
        "us",
        "",
        "[us] Time for one loop cycle",
    ),
    RegisterDefinition::documented(
        "UPTIME_MS_IREG",
        AddressSpace::InputRegister,
        input_registers::UPTIME_MS_IREG,
        2,
        "ms",
        "",
        "[ms] System uptime",
    ),
];

/// Date stamps of the example register header
pub const FIRMWARE_CREATED: &str = "24.07.2021";
pub const FIRMWARE_MODIFIED: &str = "24.07.2021";

impl RegisterTable {
    /// The register map of the example firmware
    pub fn firmware() -> Self {
        RegisterTable::new(FIRMWARE_REGISTERS.to_vec()).with_meta(TableMeta {
            created: Some(FIRMWARE_CREATED.to_string()),
            modified: Some(FIRMWARE_MODIFIED.to_string()),
        })
    }
}
