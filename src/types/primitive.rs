// Tue Oct 13 2026 - Alex

use crate::error::{Error, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
}

pub const POINTER_SIZE: usize = 8;

impl PrimitiveType {
    pub fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Bool => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_integer(self) -> bool {
        !self.is_float() && self != Self::Bool
    }

    pub fn signed_of_width(width: usize) -> Option<Self> {
        match width {
            1 => Some(Self::I8),
            2 => Some(Self::I16),
            4 => Some(Self::I32),
            8 => Some(Self::I64),
            _ => None,
        }
    }

    /// Maps a C spelling (LP64) or a Rust-style name to a primitive.
    pub fn from_c_name(name: &str) -> Option<Self> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        let ty = match normalized.as_str() {
            "i8" | "char" | "signed char" | "int8_t" => Self::I8,
            "u8" | "unsigned char" | "uint8_t" => Self::U8,
            "i16" | "short" | "short int" | "signed short" | "int16_t" => Self::I16,
            "u16" | "unsigned short" | "unsigned short int" | "uint16_t" => Self::U16,
            "i32" | "int" | "signed" | "signed int" | "int32_t" => Self::I32,
            "u32" | "unsigned" | "unsigned int" | "uint32_t" => Self::U32,
            "i64" | "long" | "long int" | "long long" | "signed long" | "int64_t" | "ssize_t" => Self::I64,
            "u64" | "unsigned long" | "unsigned long long" | "uint64_t" | "size_t" | "uintptr_t" => Self::U64,
            "f32" | "float" => Self::F32,
            "f64" | "double" => Self::F64,
            "bool" | "_Bool" => Self::Bool,
            _ => return None,
        };
        Some(ty)
    }

    pub fn decode(self, bytes: &[u8], endianness: Endianness) -> Value {
        let raw = raw_from_bytes(bytes, endianness);
        match self {
            Self::Bool => Value::Bool(raw != 0),
            Self::F32 => Value::Float(f32::from_bits(raw as u32) as f64),
            Self::F64 => Value::Float(f64::from_bits(raw)),
            _ if self.is_signed() => {
                let shift = 64 - 8 * self.size() as u32;
                Value::Int(((raw << shift) as i64) >> shift)
            }
            _ => Value::UInt(raw),
        }
    }

    pub fn encode(self, value: &Value, endianness: Endianness) -> Result<Vec<u8>> {
        let raw = match self {
            Self::F32 => (value_as_f64(self, value)? as f32).to_bits() as u64,
            Self::F64 => value_as_f64(self, value)?.to_bits(),
            Self::Bool => match value {
                Value::Bool(b) => *b as u64,
                other => self.checked_integer(other)? as u64,
            },
            _ => self.checked_integer(value)? as u64,
        };
        Ok(raw_to_bytes(raw, self.size(), endianness))
    }

    fn checked_integer(self, value: &Value) -> Result<i128> {
        let number = value
            .as_i128()
            .ok_or_else(|| Error::TypeMismatch(format!("{} cannot hold {}", self, value)))?;
        let bits = 8 * self.size() as u32;
        let (min, max) = if self == Self::Bool {
            (0, 1)
        } else if self.is_signed() {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
        } else {
            (0, (1i128 << bits) - 1)
        };
        if number < min || number > max {
            return Err(Error::TypeMismatch(format!("{} does not fit in {}", number, self)));
        }
        Ok(number)
    }
}

fn value_as_f64(ty: PrimitiveType, value: &Value) -> Result<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        other => other
            .as_i128()
            .map(|n| n as f64)
            .ok_or_else(|| Error::TypeMismatch(format!("{} cannot hold {}", ty, other))),
    }
}

pub fn raw_from_bytes(bytes: &[u8], endianness: Endianness) -> u64 {
    match endianness {
        Endianness::Little => bytes
            .iter()
            .rev()
            .fold(0u64, |acc, byte| (acc << 8) | *byte as u64),
        Endianness::Big => bytes.iter().fold(0u64, |acc, byte| (acc << 8) | *byte as u64),
    }
}

pub fn raw_to_bytes(raw: u64, size: usize, endianness: Endianness) -> Vec<u8> {
    match endianness {
        Endianness::Little => raw.to_le_bytes()[..size].to_vec(),
        Endianness::Big => raw.to_be_bytes()[8 - size..].to_vec(),
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTEGERS: [PrimitiveType; 8] = [
        PrimitiveType::I8,
        PrimitiveType::U8,
        PrimitiveType::I16,
        PrimitiveType::U16,
        PrimitiveType::I32,
        PrimitiveType::U32,
        PrimitiveType::I64,
        PrimitiveType::U64,
    ];

    #[test]
    fn test_integer_extremes_roundtrip() {
        for ty in INTEGERS {
            let bits = 8 * ty.size() as u32;
            let samples: Vec<Value> = if ty.is_signed() {
                let min = -(1i128 << (bits - 1));
                let max = (1i128 << (bits - 1)) - 1;
                [min, -1, 0, 1, max].iter().map(|n| Value::Int(*n as i64)).collect()
            } else {
                let max = ((1u128 << bits) - 1) as u64;
                [0, 1, max / 2, max].iter().map(|n| Value::UInt(*n)).collect()
            };
            for endianness in [Endianness::Little, Endianness::Big] {
                for sample in &samples {
                    let bytes = ty.encode(sample, endianness).unwrap();
                    assert_eq!(bytes.len(), ty.size());
                    assert_eq!(&ty.decode(&bytes, endianness), sample, "{} {:?}", ty, endianness);
                }
            }
        }
    }

    #[test]
    fn test_little_endian_layout() {
        let bytes = PrimitiveType::I32.encode(&Value::Int(1337), Endianness::Little).unwrap();
        assert_eq!(bytes, 1337i32.to_le_bytes().to_vec());
        let bytes = PrimitiveType::U16.encode(&Value::UInt(0x1234), Endianness::Big).unwrap();
        assert_eq!(bytes, vec![0x12, 0x34]);
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            PrimitiveType::I8.encode(&Value::Int(128), Endianness::Little),
            Err(Error::TypeMismatch(_))
        ));
        assert!(PrimitiveType::U32.encode(&Value::Int(-1), Endianness::Little).is_err());
        assert!(PrimitiveType::I32.encode(&Value::Bytes(vec![1]), Endianness::Little).is_err());
    }

    #[test]
    fn test_floats_and_bools() {
        let bytes = PrimitiveType::F64.encode(&Value::Float(2.5), Endianness::Little).unwrap();
        assert_eq!(PrimitiveType::F64.decode(&bytes, Endianness::Little), Value::Float(2.5));
        let bytes = PrimitiveType::F32.encode(&Value::Int(3), Endianness::Big).unwrap();
        assert_eq!(PrimitiveType::F32.decode(&bytes, Endianness::Big), Value::Float(3.0));
        assert_eq!(PrimitiveType::Bool.decode(&[2], Endianness::Little), Value::Bool(true));
    }

    #[test]
    fn test_c_names() {
        assert_eq!(PrimitiveType::from_c_name("unsigned   long"), Some(PrimitiveType::U64));
        assert_eq!(PrimitiveType::from_c_name("int"), Some(PrimitiveType::I32));
        assert_eq!(PrimitiveType::from_c_name("uint16_t"), Some(PrimitiveType::U16));
        assert_eq!(PrimitiveType::from_c_name("struct foo"), None);
    }
}
