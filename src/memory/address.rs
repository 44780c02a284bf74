// Mon Oct 12 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

pub const PAGE_SIZE: u64 = 0x1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    pub const fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn page(&self) -> Self {
        Self { value: self.value & !(PAGE_SIZE - 1) }
    }

    pub fn page_offset(&self) -> usize {
        (self.value & (PAGE_SIZE - 1)) as usize
    }

    /// Wrapping add, matching how a pointer would overflow in the target.
    pub fn offset(&self, offset: u64) -> Self {
        Self { value: self.value.wrapping_add(offset) }
    }

    pub fn checked_offset(&self, offset: u64) -> Option<Self> {
        self.value.checked_add(offset).map(Self::new)
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => text.parse::<u64>().ok(),
        };
        parsed.map(Self::new)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        self.offset(rhs)
    }
}

impl Sub<Address> for Address {
    type Output = u64;
    fn sub(self, rhs: Address) -> Self::Output {
        self.value.wrapping_sub(rhs.value)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
