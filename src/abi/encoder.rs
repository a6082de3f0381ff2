//! Argument encoding for contract calls and VM queries.

use std::str::FromStr;

use num_bigint::{BigInt, BigUint};

use super::types::{LeafType, PREFIX_BYTES};
use super::{BigFloat, Error, ResultExt};
use crate::address::Address;

/// Big integers wider than this are sent as their decimal string.
const MAX_BINARY_BIG_INT_BITS: u64 = 128;

/// What a `type:` alias in an argument resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArgKind {
    Leaf(LeafType),
    /// Already hex encoded, passed through after validation.
    Hex,
    /// Encodes as nothing.
    Empty,
}

impl ArgKind {
    fn from_alias(alias: &str) -> Result<Self, Error> {
        let kind = match alias.to_ascii_lowercase().as_str() {
            "i8" => ArgKind::Leaf(LeafType::I8),
            "i16" => ArgKind::Leaf(LeafType::I16),
            "i32" | "isize" => ArgKind::Leaf(LeafType::I32),
            "i64" | "i" | "int" => ArgKind::Leaf(LeafType::I64),
            "u8" => ArgKind::Leaf(LeafType::U8),
            "u16" => ArgKind::Leaf(LeafType::U16),
            "u32" | "usize" => ArgKind::Leaf(LeafType::U32),
            "u64" | "u" | "uint" => ArgKind::Leaf(LeafType::U64),
            "bigint" | "bi" | "n" => ArgKind::Leaf(LeafType::BigInt),
            "biguint" => ArgKind::Leaf(LeafType::BigUint),
            "bigfloat" | "bf" | "f" => ArgKind::Leaf(LeafType::BigFloat),
            "address" | "a" => ArgKind::Leaf(LeafType::Address),
            "bool" | "boolean" | "b" => ArgKind::Leaf(LeafType::Bool),
            "managedbuffer" | "tokenidentifier" | "bytes" | "boxedbytes" | "string" | "&str"
            | "vec<u8>" | "&[u8]" | "s" => ArgKind::Leaf(LeafType::Buffer),
            "x" | "hex" => ArgKind::Hex,
            "empty" | "0" | "e" => ArgKind::Empty,
            _ => return Err(Error::UnsupportedType(alias.to_string())),
        };
        Ok(kind)
    }
}

/// Encodes `type:value` arguments into the `@arg1@arg2` call data suffix.
///
/// A type starting with `option` (`optioni32`, `option<u8>`, `Option<u8>`) encodes the nested
/// form of the value after a `01` presence flag. An argument without a type is a string.
pub fn encode_input<S: AsRef<str>>(args: &[S]) -> Result<String, Error> {
    let mut encoded = String::new();
    for arg in args {
        let arg = arg.as_ref();
        let value = encode_argument(arg).context(|| format!("argument `{arg}`"))?;
        encoded.push('@');
        encoded.push_str(&value);
    }
    log::debug!("Encoded {} argument(s): {encoded}", args.len());
    Ok(encoded)
}

fn encode_argument(arg: &str) -> Result<String, Error> {
    let Some((ty, value)) = arg.split_once(':') else {
        return encode_value(&LeafType::Buffer, arg, false);
    };

    let (ty, is_option) = match ty
        .strip_prefix("option")
        .or_else(|| ty.strip_prefix("Option"))
    {
        Some(inner) => {
            let inner = inner
                .strip_prefix('<')
                .and_then(|inner| inner.strip_suffix('>'))
                .unwrap_or(inner);
            (inner, true)
        }
        None => (ty, false),
    };

    let encoded = match ArgKind::from_alias(ty.trim())? {
        ArgKind::Leaf(leaf) => encode_value(&leaf, value, is_option)?,
        ArgKind::Hex => {
            hex::decode(value).map_err(|_| Error::InvalidHex(value.to_string()))?;
            value.to_ascii_lowercase()
        }
        ArgKind::Empty => String::new(),
    };

    if is_option {
        Ok(format!("01{encoded}"))
    } else {
        Ok(encoded)
    }
}

/// Encodes a single leaf value given in its textual form.
///
/// Top-level integers use the smallest of 1, 2, 4 or 8 bytes that holds them, nested ones their
/// declared width. Nested dynamic values carry a 4-byte length prefix.
pub fn encode_value(leaf: &LeafType, value: &str, nested: bool) -> Result<String, Error> {
    let value = value.trim();
    let encoded = match leaf {
        LeafType::I8 | LeafType::I16 | LeafType::I32 | LeafType::I64 => {
            encode_signed(leaf, value, nested)?
        }
        LeafType::U8 | LeafType::U16 | LeafType::U32 | LeafType::U64 => {
            encode_unsigned(leaf, value, nested)?
        }
        LeafType::Bool => match value {
            "true" => "01".to_string(),
            "false" if nested => "00".to_string(),
            "false" => String::new(),
            other => {
                return Err(Error::InvalidValue(format!(
                    "`{other}` is not `true` or `false`"
                )));
            }
        },
        LeafType::BigInt => with_prefix(encode_big_int(value)?, nested),
        LeafType::BigUint => {
            let parsed = BigUint::from_str(value)
                .map_err(|e| Error::InvalidValue(format!("`{value}` as BigUint: {e}")))?;
            with_prefix(hex::encode(parsed.to_bytes_be()), nested)
        }
        LeafType::BigFloat => with_prefix(
            hex::encode(BigFloat::parse_decimal(value)?.to_gob_bytes()),
            nested,
        ),
        LeafType::Address => Address::from_bech32(value)?.to_hex(),
        LeafType::Buffer => with_prefix(hex::encode(value), nested),
        LeafType::Struct(name) => return Err(Error::UnsupportedType(name.clone())),
    };
    Ok(encoded)
}

fn encode_signed(leaf: &LeafType, value: &str, nested: bool) -> Result<String, Error> {
    let parsed = i64::from_str(value)
        .map_err(|e| Error::InvalidValue(format!("`{value}` as {leaf}: {e}")))?;
    let declared = leaf.int_width().unwrap_or(8);
    let fits = |width: usize| {
        let bits = width as u32 * 8;
        width == 8 || (-(1i64 << (bits - 1))..(1i64 << (bits - 1))).contains(&parsed)
    };
    if !fits(declared) {
        return Err(Error::InvalidValue(format!("`{value}` overflows {leaf}")));
    }
    let width = if nested {
        declared
    } else {
        [1, 2, 4, 8].into_iter().find(|w| fits(*w)).unwrap_or(8)
    };
    Ok(hex::encode(&parsed.to_be_bytes()[8 - width..]))
}

fn encode_unsigned(leaf: &LeafType, value: &str, nested: bool) -> Result<String, Error> {
    let parsed = u64::from_str(value)
        .map_err(|e| Error::InvalidValue(format!("`{value}` as {leaf}: {e}")))?;
    let declared = leaf.int_width().unwrap_or(8);
    let fits = |width: usize| width == 8 || parsed < 1u64 << (width * 8);
    if !fits(declared) {
        return Err(Error::InvalidValue(format!("`{value}` overflows {leaf}")));
    }
    let width = if nested {
        declared
    } else {
        [1, 2, 4, 8].into_iter().find(|w| fits(*w)).unwrap_or(8)
    };
    Ok(hex::encode(&parsed.to_be_bytes()[8 - width..]))
}

fn encode_big_int(value: &str) -> Result<String, Error> {
    let parsed = BigInt::from_str(value)
        .map_err(|e| Error::InvalidValue(format!("`{value}` as BigInt: {e}")))?;
    if parsed.bits() > MAX_BINARY_BIG_INT_BITS {
        return Ok(hex::encode(value));
    }
    Ok(hex::encode(parsed.to_signed_bytes_be()))
}

fn with_prefix(hex: String, nested: bool) -> String {
    if nested {
        format!("{:0width$x}{hex}", hex.len() / 2, width = PREFIX_BYTES * 2)
    } else {
        hex
    }
}
