// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! 32-bit values stored across two consecutive 16-bit registers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which of the two consecutive offsets holds the low half of a 32-bit value.
///
/// The register headers document offset `N` as the lower part and `N + 1`
/// as the higher part, so `LowWordFirst` is the default. Some clients read
/// the pair the other way round (`words[0] << 16 | words[1]`); they select
/// `HighWordFirst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordOrder {
    #[default]
    LowWordFirst,
    HighWordFirst,
}

impl WordOrder {
    /// Combine two words, in offset order, into one 32-bit value.
    pub const fn combine(self, words: [u16; 2]) -> u32 {
        let (low, high) = match self {
            WordOrder::LowWordFirst => (words[0], words[1]),
            WordOrder::HighWordFirst => (words[1], words[0]),
        };
        ((high as u32) << 16) | low as u32
    }

    /// Split a 32-bit value into two words, in offset order.
    pub const fn split(self, value: u32) -> [u16; 2] {
        let low = (value & 0xFFFF) as u16;
        let high = (value >> 16) as u16;
        match self {
            WordOrder::LowWordFirst => [low, high],
            WordOrder::HighWordFirst => [high, low],
        }
    }

    /// Offsets of the (low, high) halves of a pair starting at `offset`
    pub const fn halves(self, offset: u16) -> (u16, u16) {
        match self {
            WordOrder::LowWordFirst => (offset, offset.wrapping_add(1)),
            WordOrder::HighWordFirst => (offset.wrapping_add(1), offset),
        }
    }
}

impl FromStr for WordOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "low_word_first" | "low" | "le" => Ok(WordOrder::LowWordFirst),
            "high_word_first" | "high" | "be" => Ok(WordOrder::HighWordFirst),
            other => Err(format!("unknown word order '{other}'")),
        }
    }
}

impl fmt::Display for WordOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordOrder::LowWordFirst => f.write_str("low_word_first"),
            WordOrder::HighWordFirst => f.write_str("high_word_first"),
        }
    }
}
