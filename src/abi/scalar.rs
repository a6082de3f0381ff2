//! Leaf value decoding.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use super::types::LeafType;
use super::{BigFloat, DecodedValue, Error, HexCursor};
use crate::address::{ADDRESS_LEN, Address};

/// Decodes one leaf value from the cursor.
///
/// `byte_len` is the length read from a preceding prefix for dynamic leaves; without it they
/// consume the rest of the input.
///
/// Fixed-width integers take their declared width. Only a `top_level` value, which owns the
/// whole payload, may be shorter than that, and it still needs at least one byte. An empty
/// top-level bool is `false`.
pub fn decode_scalar(
    cursor: &mut HexCursor<'_>,
    leaf: &LeafType,
    byte_len: Option<usize>,
    top_level: bool,
) -> Result<DecodedValue, Error> {
    let value = match leaf {
        LeafType::I8 => DecodedValue::I8(decode_signed(cursor, 1, top_level)? as i8),
        LeafType::I16 => DecodedValue::I16(decode_signed(cursor, 2, top_level)? as i16),
        LeafType::I32 => DecodedValue::I32(decode_signed(cursor, 4, top_level)? as i32),
        LeafType::I64 => DecodedValue::I64(decode_signed(cursor, 8, top_level)?),
        LeafType::U8 => DecodedValue::U8(decode_unsigned(cursor, 1, top_level)? as u8),
        LeafType::U16 => DecodedValue::U16(decode_unsigned(cursor, 2, top_level)? as u16),
        LeafType::U32 => DecodedValue::U32(decode_unsigned(cursor, 4, top_level)? as u32),
        LeafType::U64 => DecodedValue::U64(decode_unsigned(cursor, 8, top_level)?),
        LeafType::Bool if top_level && cursor.is_empty() => DecodedValue::Bool(false),
        LeafType::Bool => DecodedValue::Bool(cursor.take(2)? == "01"),
        LeafType::Address => {
            let raw = cursor.take(ADDRESS_LEN * 2)?;
            DecodedValue::Address(Address::from_bytes(&decode_hex_bytes(raw)?)?)
        }
        LeafType::Buffer => {
            let bytes = decode_hex_bytes(cursor.take_bytes(byte_len)?)?;
            match String::from_utf8(bytes) {
                Ok(text) => DecodedValue::String(text),
                Err(e) => DecodedValue::Bytes(e.into_bytes()),
            }
        }
        LeafType::BigInt => DecodedValue::BigInt(decode_big_int(cursor.take_bytes(byte_len)?)?),
        LeafType::BigUint => {
            DecodedValue::BigUint(decode_big_uint(cursor.take_bytes(byte_len)?)?)
        }
        LeafType::BigFloat => {
            let bytes = decode_hex_bytes(cursor.take_bytes(byte_len)?)?;
            DecodedValue::BigFloat(BigFloat::from_gob_bytes(&bytes)?)
        }
        LeafType::Struct(name) => return Err(Error::UnsupportedType(name.clone())),
    };
    Ok(value)
}

/// Hex-decodes a payload fragment, naming the fragment on failure.
pub fn decode_hex_bytes(raw: &str) -> Result<Vec<u8>, Error> {
    hex::decode(raw).map_err(|_| Error::InvalidHex(raw.to_string()))
}

/// Arbitrary-precision signed integer, accepting both wire forms.
///
/// An ASCII decimal literal wins over the two's-complement reading of the same bytes.
pub fn decode_big_int(raw: &str) -> Result<BigInt, Error> {
    if raw.is_empty() {
        return Ok(BigInt::zero());
    }
    if let Some(value) = parse_decimal_literal(raw, true) {
        return Ok(value);
    }
    if let Some(value) = parse_wide_twos_complement(raw) {
        return Ok(value);
    }
    if raw.len() > 16 {
        return Err(Error::InvalidHex(raw.to_string()));
    }
    parse_signed(raw).map(BigInt::from)
}

/// Arbitrary-precision unsigned integer: an ASCII decimal literal or raw big-endian bytes.
pub fn decode_big_uint(raw: &str) -> Result<BigUint, Error> {
    if raw.is_empty() {
        return Ok(BigUint::zero());
    }
    if let Some(value) = parse_decimal_literal(raw, false) {
        return Ok(value.magnitude().clone());
    }
    ensure_hex(raw)?;
    BigUint::parse_bytes(raw.as_bytes(), 16).ok_or_else(|| Error::InvalidHex(raw.to_string()))
}

fn take_fixed<'a>(
    cursor: &mut HexCursor<'a>,
    width: usize,
    top_level: bool,
) -> Result<&'a str, Error> {
    if top_level && !cursor.is_empty() {
        Ok(cursor.take_up_to(width * 2))
    } else {
        cursor.take(width * 2)
    }
}

fn decode_signed(cursor: &mut HexCursor<'_>, width: usize, top_level: bool) -> Result<i64, Error> {
    parse_signed(take_fixed(cursor, width, top_level)?)
}

fn decode_unsigned(
    cursor: &mut HexCursor<'_>,
    width: usize,
    top_level: bool,
) -> Result<u64, Error> {
    parse_unsigned(take_fixed(cursor, width, top_level)?)
}

fn parse_unsigned(raw: &str) -> Result<u64, Error> {
    if raw.is_empty() {
        return Ok(0);
    }
    ensure_hex(raw)?;
    u64::from_str_radix(raw, 16).map_err(|_| Error::InvalidHex(raw.to_string()))
}

/// Reads up to 8 bytes and sign-extends from the number of bytes present.
fn parse_signed(raw: &str) -> Result<i64, Error> {
    let value = parse_unsigned(raw)?;
    if raw.is_empty() {
        return Ok(0);
    }
    let shift = 64 - raw.len().div_ceil(2) as u32 * 8;
    Ok(((value << shift) as i64) >> shift)
}

fn parse_wide_twos_complement(raw: &str) -> Option<BigInt> {
    if ensure_hex(raw).is_err() {
        return None;
    }
    let value = BigInt::parse_bytes(raw.as_bytes(), 16)?;
    let bits = raw.len() * 4;
    let max = (BigInt::one() << (bits - 1)) - 1;
    if value > BigInt::from(u64::MAX) && value <= max {
        Some(value)
    } else if value > max {
        Some(value - (BigInt::one() << bits))
    } else {
        None
    }
}

/// Interprets the bytes behind `raw` as an optionally signed base-10 literal.
fn parse_decimal_literal(raw: &str, allow_negative: bool) -> Option<BigInt> {
    let bytes = hex::decode(raw).ok()?;
    let (sign, digits) = match bytes.split_first() {
        Some((b'-', rest)) if allow_negative => (Sign::Minus, rest),
        Some((b'+', rest)) => (Sign::Plus, rest),
        _ => (Sign::Plus, bytes.as_slice()),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let magnitude = BigUint::parse_bytes(digits, 10)?;
    Some(BigInt::from_biguint(sign, magnitude))
}

fn ensure_hex(raw: &str) -> Result<(), Error> {
    if raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(Error::InvalidHex(raw.to_string()))
    }
}
