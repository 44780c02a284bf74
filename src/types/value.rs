// Tue Oct 13 2026 - Alex

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// A decoded snapshot of what a view currently reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Pointer(u64),
    Bytes(Vec<u8>),
    Enum { tag: Option<String>, raw: i64 },
    Array(Vec<Value>),
    Record(IndexMap<String, Value>),
}

impl Value {
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Bool(b) => Some(*b as i128),
            Self::Int(n) => Some(*n as i128),
            Self::UInt(n) | Self::Pointer(n) => Some(*n as i128),
            Self::Enum { raw, .. } => Some(*raw as i128),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|n| i64::try_from(n).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|n| u64::try_from(n).ok())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Enum { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    pub fn tagged(tag: &str) -> Self {
        Self::Enum {
            tag: Some(tag.to_string()),
            raw: 0,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::UInt(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Pointer(address) => write!(f, "0x{:x}", address),
            Self::Bytes(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Self::Enum { tag: Some(tag), .. } => f.write_str(tag),
            Self::Enum { tag: None, raw } => write!(f, "{}", raw),
            Self::Array(items) => write!(f, "[{}]", items.iter().join(", ")),
            Self::Record(fields) => write!(
                f,
                "{{ {} }}",
                fields.iter().map(|(name, value)| format!("{}: {}", name, value)).join(", ")
            ),
        }
    }
}
