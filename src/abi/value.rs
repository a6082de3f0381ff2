use std::fmt;

use num_bigint::{BigInt, BigUint};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::BigFloat;
use crate::address::Address;

/// A decoded ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    BigInt(BigInt),
    BigUint(BigUint),
    BigFloat(BigFloat),
    Bool(bool),
    String(String),
    /// Buffer contents that are not valid UTF-8.
    Bytes(Vec<u8>),
    Address(Address),
    /// Lists, tuples and multi-payload results.
    List(Vec<DecodedValue>),
    /// `None` is the marker for an absent option.
    Option(Option<Box<DecodedValue>>),
    Struct(StructValue),
}

impl DecodedValue {
    pub fn absent() -> Self {
        DecodedValue::Option(None)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Option(None))
    }

    /// Widens any fixed-width integer to `i64`, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            DecodedValue::I8(v) => Some(v.into()),
            DecodedValue::I16(v) => Some(v.into()),
            DecodedValue::I32(v) => Some(v.into()),
            DecodedValue::I64(v) => Some(v),
            DecodedValue::U8(v) => Some(v.into()),
            DecodedValue::U16(v) => Some(v.into()),
            DecodedValue::U32(v) => Some(v.into()),
            DecodedValue::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Widens any unsigned fixed-width integer to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            DecodedValue::U8(v) => Some(v.into()),
            DecodedValue::U16(v) => Some(v.into()),
            DecodedValue::U32(v) => Some(v.into()),
            DecodedValue::U64(v) => Some(v),
            _ => None,
        }
    }

    /// Any integer value as an arbitrary-precision integer.
    pub fn to_big_int(&self) -> Option<BigInt> {
        match self {
            DecodedValue::BigInt(v) => Some(v.clone()),
            DecodedValue::BigUint(v) => Some(BigInt::from(v.clone())),
            DecodedValue::U64(v) => Some(BigInt::from(*v)),
            other => other.as_i64().map(BigInt::from),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            DecodedValue::Address(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            DecodedValue::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// The inner value of a present option. Non-option values are returned unchanged.
    pub fn present(&self) -> Option<&DecodedValue> {
        match self {
            DecodedValue::Option(inner) => inner.as_deref(),
            other => Some(other),
        }
    }
}

/// Struct fields in the order the ABI declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructValue {
    name: String,
    fields: Vec<(String, DecodedValue)>,
}

impl StructValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Name of the ABI type this value was decoded as.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, field: impl Into<String>, value: DecodedValue) {
        self.fields.push((field.into(), value));
    }

    pub fn get(&self, field: &str) -> Option<&DecodedValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DecodedValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for StructValue {
    type Item = (String, DecodedValue);
    type IntoIter = std::vec::IntoIter<(String, DecodedValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for StructValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::I8(v) => serializer.serialize_i8(*v),
            DecodedValue::I16(v) => serializer.serialize_i16(*v),
            DecodedValue::I32(v) => serializer.serialize_i32(*v),
            DecodedValue::I64(v) => serializer.serialize_i64(*v),
            DecodedValue::U8(v) => serializer.serialize_u8(*v),
            DecodedValue::U16(v) => serializer.serialize_u16(*v),
            DecodedValue::U32(v) => serializer.serialize_u32(*v),
            DecodedValue::U64(v) => serializer.serialize_u64(*v),
            // Big numbers as strings so JSON consumers keep every digit.
            DecodedValue::BigInt(v) => serializer.collect_str(v),
            DecodedValue::BigUint(v) => serializer.collect_str(v),
            DecodedValue::BigFloat(v) => serializer.collect_str(v),
            DecodedValue::Bool(v) => serializer.serialize_bool(*v),
            DecodedValue::String(v) => serializer.serialize_str(v),
            DecodedValue::Bytes(v) => serializer.serialize_str(&hex::encode(v)),
            DecodedValue::Address(v) => v.serialize(serializer),
            DecodedValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DecodedValue::Option(None) => serializer.serialize_none(),
            DecodedValue::Option(Some(inner)) => serializer.serialize_some(inner.as_ref()),
            DecodedValue::Struct(fields) => fields.serialize(serializer),
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::I8(v) => write!(f, "{v}"),
            DecodedValue::I16(v) => write!(f, "{v}"),
            DecodedValue::I32(v) => write!(f, "{v}"),
            DecodedValue::I64(v) => write!(f, "{v}"),
            DecodedValue::U8(v) => write!(f, "{v}"),
            DecodedValue::U16(v) => write!(f, "{v}"),
            DecodedValue::U32(v) => write!(f, "{v}"),
            DecodedValue::U64(v) => write!(f, "{v}"),
            DecodedValue::BigInt(v) => write!(f, "{v}"),
            DecodedValue::BigUint(v) => write!(f, "{v}"),
            DecodedValue::BigFloat(v) => write!(f, "{v}"),
            DecodedValue::Bool(v) => write!(f, "{v}"),
            DecodedValue::String(v) => write!(f, "{v:?}"),
            DecodedValue::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            DecodedValue::Address(v) => write!(f, "{v}"),
            DecodedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            DecodedValue::Option(None) => f.write_str("None"),
            DecodedValue::Option(Some(inner)) => write!(f, "Some({inner})"),
            DecodedValue::Struct(fields) => {
                write!(f, "{} {{", fields.name())?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DecodedValue {
                fn from(value: $ty) -> Self {
                    DecodedValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    BigInt => BigInt,
    BigUint => BigUint,
    BigFloat => BigFloat,
    bool => Bool,
    String => String,
    Address => Address,
    Vec<DecodedValue> => List,
    StructValue => Struct,
}

impl From<&str> for DecodedValue {
    fn from(value: &str) -> Self {
        DecodedValue::String(value.to_string())
    }
}
