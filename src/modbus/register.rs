// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-register-map project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! A single named register definition

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use super::address_space::{Access, AddressSpace, ValueDomain};
use super::wide::WordOrder;

/// A symbolic register name bound to an offset in one address space.
///
/// `len` counts consecutive offsets. A definition with `len == 2` in one of
/// the register spaces is a 32-bit value split into a low and a high word.
/// `unit`, `range` and `description` are documentation only and are empty
/// when the source does not provide them. `test` is the value a test bench
/// expects to read back, with `-1` meaning any value is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDefinition {
    pub name: Cow<'static, str>,
    pub space: AddressSpace,
    pub offset: u16,
    pub len: u16,
    pub unit: Cow<'static, str>,
    pub range: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub test: Option<i64>,
}

impl RegisterDefinition {
    /// Build a definition from static strings, usable in `const` tables.
    pub const fn documented(
        name: &'static str,
        space: AddressSpace,
        offset: u16,
        len: u16,
        unit: &'static str,
        range: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            space,
            offset,
            len,
            unit: Cow::Borrowed(unit),
            range: Cow::Borrowed(range),
            description: Cow::Borrowed(description),
            test: None,
        }
    }

    /// Single-offset definition without documentation
    pub fn new(name: impl Into<String>, space: AddressSpace, offset: u16) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            space,
            offset,
            len: 1,
            unit: Cow::Borrowed(""),
            range: Cow::Borrowed(""),
            description: Cow::Borrowed(""),
            test: None,
        }
    }

    /// Set the number of consecutive offsets covered by the definition.
    ///
    /// # Arguments
    ///
    /// * `len` - Offset count, `2` for a 32-bit register pair
    pub fn with_len(mut self, len: u16) -> Self {
        self.len = len;
        self
    }

    /// Set the documented unit, e.g. `volt` or `ms`
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Cow::Owned(unit.into());
        self
    }

    /// Set the documented range text, e.g. `0, 100000`
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Cow::Owned(range.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Cow::Owned(description.into());
        self
    }

    /// Set the value a test bench expects to read from this definition
    pub fn with_test(mut self, expected: i64) -> Self {
        self.test = Some(expected);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documented unit, `None` when the unit text is empty
    pub fn unit(&self) -> Option<&str> {
        (!self.unit.is_empty()).then_some(&*self.unit)
    }

    /// Access mode of the address space holding this definition
    pub fn access(&self) -> Access {
        self.space.access()
    }

    /// Offsets covered by this definition, as `u32` so the end never overflows
    pub fn span(&self) -> Range<u32> {
        let start = u32::from(self.offset);
        start..start + u32::from(self.len)
    }

    pub fn contains_offset(&self, offset: u16) -> bool {
        self.span().contains(&u32::from(offset))
    }

    /// `true` when the definition is a 32-bit value stored in two registers
    pub fn is_wide(&self) -> bool {
        !self.space.is_bit() && self.len == 2
    }

    /// Offsets of the (low, high) halves when this is a wide definition
    pub fn wide_pair(&self, order: WordOrder) -> Option<(u16, u16)> {
        self.is_wide().then(|| order.halves(self.offset))
    }

    /// Value domain of the whole definition.
    ///
    /// Wide definitions span [0, 2^32 - 1]. Any other definition is checked
    /// per element, so a multi-bit coil block still holds {0, 1} values.
    pub fn value_domain(&self) -> ValueDomain {
        if self.is_wide() {
            ValueDomain::DOUBLE_WORD
        } else {
            self.space.element_domain()
        }
    }

    /// Check a value against the value domain of the definition.
    ///
    /// # Returns
    ///
    /// `true` when `value` can be stored, e.g. `0` or `1` for a coil
    pub fn accepts(&self, value: i64) -> bool {
        self.value_domain().contains(value)
    }

    /// Documented `[min, max]` range.
    ///
    /// `None` when no range is documented, `Some(Err(..))` when the text
    /// cannot be read as two integers.
    pub fn documented_range(&self) -> Option<Result<(i64, i64), String>> {
        if self.range.trim().is_empty() {
            return None;
        }
        Some(parse_range(&self.range))
    }
}

fn parse_range(text: &str) -> Result<(i64, i64), String> {
    let mut bounds = text.split(',').map(|part| {
        // accept thousand separators like "100.000"
        let digits: String = part
            .trim()
            .chars()
            .filter(|c| *c != '.' && *c != '_' && *c != '\'')
            .collect();
        digits.parse::<i64>()
    });
    match (bounds.next(), bounds.next(), bounds.next()) {
        (Some(Ok(min)), Some(Ok(max)), None) if min <= max => Ok((min, max)),
        (Some(Ok(min)), Some(Ok(max)), None) => Err(format!("minimum {min} above maximum {max}")),
        _ => Err(format!("'{text}' is not of the form 'min, max'")),
    }
}

impl fmt::Display for RegisterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}", self.name, self.space, self.offset)?;
        if self.len > 1 {
            write!(f, "..={}", u32::from(self.offset) + u32::from(self.len) - 1)?;
        }
        f.write_str(")")
    }
}
