//! Arbitrary-precision binary floats in the `GobEncode` interchange layout.
//!
//! Contracts serialize `BigFloat` values as a version byte, a packed flag byte, a 32-bit
//! precision and, for finite values, a 32-bit exponent followed by the mantissa words:
//!
//! ```text
//! 01 | mode<<5 | (acc+1)<<3 | form<<1 | neg | prec:u32 | exp:i32 | mantissa (big-endian words)
//! ```
//!
//! The value is `0.mantissa * 2^exp`, with the mantissa normalized so that its top bit is set.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

use super::Error;

/// Layout version written in the first byte.
pub const GOB_VERSION: u8 = 1;
/// Precision used when parsing decimal literals and converting from `f64`.
pub const DEFAULT_PRECISION: u32 = 53;

const WORD_BITS: u64 = 64;
const WORD_BYTES: usize = 8;
// Bounds the work spent expanding decimal exponents into exact rationals.
const MAX_DECIMAL_EXPONENT: i64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    #[default]
    ToNearestEven,
    ToNearestAway,
    ToZero,
    AwayFromZero,
    ToNegativeInf,
    ToPositiveInf,
}

impl RoundingMode {
    fn from_bits(bits: u8) -> Result<Self, Error> {
        Ok(match bits {
            0 => RoundingMode::ToNearestEven,
            1 => RoundingMode::ToNearestAway,
            2 => RoundingMode::ToZero,
            3 => RoundingMode::AwayFromZero,
            4 => RoundingMode::ToNegativeInf,
            5 => RoundingMode::ToPositiveInf,
            other => {
                return Err(Error::InvalidBigFloat(format!(
                    "unknown rounding mode {other}"
                )));
            }
        })
    }
}

/// Whether the stored value is below, equal to or above the exact value it was rounded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    Below,
    #[default]
    Exact,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Zero,
    Finite,
    Infinite,
}

/// Arbitrary-precision binary floating point number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigFloat {
    mode: RoundingMode,
    accuracy: Accuracy,
    form: Form,
    negative: bool,
    precision: u32,
    exponent: i32,
    mantissa: BigUint,
}

impl Default for BigFloat {
    fn default() -> Self {
        Self::zero(0)
    }
}

impl BigFloat {
    /// Returns a positive zero with the given precision.
    pub fn zero(precision: u32) -> Self {
        Self {
            mode: RoundingMode::ToNearestEven,
            accuracy: Accuracy::Exact,
            form: Form::Zero,
            negative: false,
            precision,
            exponent: 0,
            mantissa: BigUint::zero(),
        }
    }

    pub fn infinity(negative: bool) -> Self {
        Self {
            form: Form::Infinite,
            negative,
            ..Self::zero(DEFAULT_PRECISION)
        }
    }

    /// Converts an `f64` exactly, with a precision of 53 bits.
    pub fn from_f64(value: f64) -> Result<Self, Error> {
        if value.is_nan() {
            return Err(Error::InvalidBigFloat("NaN has no representation".into()));
        }
        let negative = value.is_sign_negative();
        if value == 0.0 {
            return Ok(Self {
                negative,
                ..Self::zero(DEFAULT_PRECISION)
            });
        }
        if value.is_infinite() {
            return Ok(Self::infinity(negative));
        }

        let bits = value.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1u64 << 52) - 1);
        let (word, exponent) = if biased == 0 {
            let shift = fraction.leading_zeros();
            (fraction << shift, -1010 - shift as i32)
        } else {
            ((fraction | 1u64 << 52) << 11, biased - 1022)
        };

        Ok(Self {
            form: Form::Finite,
            negative,
            exponent,
            mantissa: BigUint::from(word),
            ..Self::zero(DEFAULT_PRECISION)
        })
    }

    /// Parses a decimal literal (`-12.5`, `3e-2`, `Inf`).
    ///
    /// The exact value is rounded to 64 bits and then to 53 bits, both to nearest-even, and the
    /// result is marked exact.
    pub fn parse_decimal(literal: &str) -> Result<Self, Error> {
        let literal = literal.trim();
        let unsigned = literal.trim_start_matches(['+', '-']);
        let negative = literal.starts_with('-');
        if unsigned.eq_ignore_ascii_case("inf") {
            return Ok(Self::infinity(negative));
        }

        let decimal = BigDecimal::from_str(literal)
            .map_err(|e| Error::InvalidBigFloat(format!("`{literal}`: {e}")))?;
        let (digits, scale) = decimal.as_bigint_and_exponent();
        if digits.is_zero() {
            return Ok(Self {
                negative,
                ..Self::zero(DEFAULT_PRECISION)
            });
        }
        if scale.abs() > MAX_DECIMAL_EXPONENT {
            return Err(Error::InvalidBigFloat(format!(
                "`{literal}`: exponent out of range"
            )));
        }

        let magnitude = digits.magnitude().clone();
        let ten = BigUint::from(10u32);
        let (num, den) = if scale >= 0 {
            (magnitude, ten.pow(scale as u32))
        } else {
            (magnitude * ten.pow((-scale) as u32), BigUint::from(1u32))
        };

        let (wide, exponent) = round_ratio(&num, &den, WORD_BITS);
        let (narrow, carry) = round_shift(&wide, WORD_BITS - DEFAULT_PRECISION as u64);
        let exponent = exponent + carry as i64;
        let exponent = i32::try_from(exponent).map_err(|_| {
            Error::InvalidBigFloat(format!("`{literal}`: exponent out of range"))
        })?;

        Ok(Self {
            form: Form::Finite,
            negative: digits.sign() == Sign::Minus,
            exponent,
            mantissa: narrow << (WORD_BITS - DEFAULT_PRECISION as u64),
            ..Self::zero(DEFAULT_PRECISION)
        })
    }

    /// Decodes the binary interchange layout. An empty buffer is zero.
    pub fn from_gob_bytes(buf: &[u8]) -> Result<Self, Error> {
        if buf.is_empty() {
            return Ok(Self::default());
        }
        if buf.len() < 6 {
            return Err(Error::InvalidBigFloat(format!(
                "buffer too small: {} bytes",
                buf.len()
            )));
        }
        if buf[0] != GOB_VERSION {
            return Err(Error::InvalidBigFloat(format!(
                "unsupported version {}",
                buf[0]
            )));
        }

        let flags = buf[1];
        let mode = RoundingMode::from_bits((flags >> 5) & 7)?;
        let accuracy = match (flags >> 3) & 3 {
            0 => Accuracy::Below,
            1 => Accuracy::Exact,
            2 => Accuracy::Above,
            other => {
                return Err(Error::InvalidBigFloat(format!("unknown accuracy {other}")));
            }
        };
        let form = match (flags >> 1) & 3 {
            0 => Form::Zero,
            1 => Form::Finite,
            2 => Form::Infinite,
            other => return Err(Error::InvalidBigFloat(format!("unknown form {other}"))),
        };
        let negative = flags & 1 == 1;
        let precision = u32::from_be_bytes([buf[2], buf[3], buf[4], buf[5]]);

        let mut value = Self {
            mode,
            accuracy,
            form,
            negative,
            precision,
            exponent: 0,
            mantissa: BigUint::zero(),
        };
        if form != Form::Finite {
            return Ok(value);
        }

        if buf.len() < 10 {
            return Err(Error::InvalidBigFloat(format!(
                "finite value needs at least 10 bytes, got {}",
                buf.len()
            )));
        }
        if precision == 0 {
            return Err(Error::InvalidBigFloat("finite value with zero precision".into()));
        }
        value.exponent = i32::from_be_bytes([buf[6], buf[7], buf[8], buf[9]]);
        value.mantissa = BigUint::from_bytes_be(&buf[10..]);
        if value.mantissa.is_zero() || value.mantissa.bits() % WORD_BITS != 0 {
            return Err(Error::InvalidBigFloat("mantissa is not normalized".into()));
        }

        Ok(value)
    }

    /// Encodes into the binary interchange layout.
    pub fn to_gob_bytes(&self) -> Vec<u8> {
        let accuracy = match self.accuracy {
            Accuracy::Below => 0u8,
            Accuracy::Exact => 1,
            Accuracy::Above => 2,
        };
        let form = match self.form {
            Form::Zero => 0u8,
            Form::Finite => 1,
            Form::Infinite => 2,
        };
        let flags = (self.mode as u8) << 5 | accuracy << 3 | form << 1 | self.negative as u8;

        let mut buf = Vec::with_capacity(10 + WORD_BYTES * 2);
        buf.push(GOB_VERSION);
        buf.push(flags);
        buf.extend_from_slice(&self.precision.to_be_bytes());
        if self.form != Form::Finite {
            return buf;
        }

        buf.extend_from_slice(&self.exponent.to_be_bytes());
        let stored_words = self.mantissa.bits().div_ceil(WORD_BITS);
        let words = (self.precision as u64).div_ceil(WORD_BITS).min(stored_words);
        let top = &self.mantissa >> ((stored_words - words) * WORD_BITS);
        let bytes = top.to_bytes_be();
        let width = words as usize * WORD_BYTES;
        buf.resize(buf.len() + width.saturating_sub(bytes.len()), 0);
        buf.extend_from_slice(&bytes);
        buf
    }

    pub fn is_zero(&self) -> bool {
        self.form == Form::Zero
    }

    pub fn is_infinite(&self) -> bool {
        self.form == Form::Infinite
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn mode(&self) -> RoundingMode {
        self.mode
    }

    pub fn accuracy(&self) -> Accuracy {
        self.accuracy
    }

    /// Binary exponent of the `0.mantissa * 2^exp` form.
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Nearest `f64`. Values beyond the `f64` range become infinite.
    pub fn to_f64(&self) -> f64 {
        let magnitude = match self.form {
            Form::Zero => 0.0,
            Form::Infinite => f64::INFINITY,
            Form::Finite => {
                let extra = self.mantissa.bits().saturating_sub(WORD_BITS);
                let top = (&self.mantissa >> extra).to_u64().unwrap_or(u64::MAX);
                scale_pow2(top as f64, self.exponent as i64 - WORD_BITS as i64)
            }
        };
        if self.negative { -magnitude } else { magnitude }
    }

    /// Exact decimal value; `None` for infinities.
    pub fn to_big_decimal(&self) -> Option<BigDecimal> {
        let magnitude = match self.form {
            Form::Infinite => return None,
            Form::Zero => return Some(BigDecimal::zero()),
            Form::Finite => {
                let shift = self.exponent as i64 - self.mantissa.bits() as i64;
                if shift >= 0 {
                    BigDecimal::new(BigInt::from(&self.mantissa << shift as u64), 0)
                } else {
                    let five = BigUint::from(5u32).pow((-shift) as u32);
                    BigDecimal::new(BigInt::from(&self.mantissa * five), -shift)
                }
            }
        };
        let value = if self.negative { -magnitude } else { magnitude };
        Some(value.normalized())
    }

    /// Magnitude as `0x.<hex mantissa>p<exponent>`, the value being `0.mantissa * 2^exponent`.
    fn to_binary_exponent_string(&self) -> String {
        let pad = (4 - self.mantissa.bits() % 4) % 4;
        let digits = (&self.mantissa << pad).to_str_radix(16);
        format!("0x.{}p{:+}", digits.trim_end_matches('0'), self.exponent)
    }

    fn significant_bits(&self) -> u64 {
        let trailing = self.mantissa.trailing_zeros().unwrap_or(0);
        self.mantissa.bits() - trailing
    }
}

impl FromStr for BigFloat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl fmt::Display for BigFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        match self.form {
            Form::Zero => write!(f, "{sign}0"),
            Form::Infinite => write!(f, "{}Inf", if self.negative { "-" } else { "+" }),
            Form::Finite => {
                let approx = self.to_f64();
                if !approx.is_finite() || approx == 0.0 {
                    // Beyond f64 range the exact decimal has too many digits to print.
                    write!(f, "{sign}{}", self.to_binary_exponent_string())
                } else if self.significant_bits() <= DEFAULT_PRECISION as u64 {
                    write!(f, "{approx}")
                } else {
                    match self.to_big_decimal() {
                        Some(exact) => write!(f, "{exact}"),
                        None => Err(fmt::Error),
                    }
                }
            }
        }
    }
}

/// Rounds `num / den` to `bits` significant bits, nearest-even.
/// Returns the mantissa and `e` such that the value is `mantissa * 2^(e - bits)`.
fn round_ratio(num: &BigUint, den: &BigUint, bits: u64) -> (BigUint, i64) {
    let mut e = num.bits() as i64 - den.bits() as i64;
    if cmp_pow2(num, den, e) != Ordering::Less {
        e += 1;
    }

    let shift = bits as i64 - e;
    let (n, d) = if shift >= 0 {
        (num << shift as u64, den.clone())
    } else {
        (num.clone(), den << (-shift) as u64)
    };
    let mut q = &n / &d;
    let r = &n % &d;
    let twice = &r << 1u8;
    if twice > d || (twice == d && q.bit(0)) {
        q += 1u32;
    }
    if q.bits() > bits {
        q >>= 1u8;
        e += 1;
    }
    (q, e)
}

/// Drops `shift` low bits with nearest-even rounding. The flag reports a carry into a new bit.
fn round_shift(value: &BigUint, shift: u64) -> (BigUint, bool) {
    let kept_bits = value.bits() - shift;
    let mut q = value >> shift;
    let half = BigUint::from(1u32) << (shift - 1);
    let rest = value - (&q << shift);
    if rest > half || (rest == half && q.bit(0)) {
        q += 1u32;
    }
    if q.bits() > kept_bits {
        q >>= 1u8;
        return (q, true);
    }
    (q, false)
}

/// Compares `num / den` with `2^k`.
fn cmp_pow2(num: &BigUint, den: &BigUint, k: i64) -> Ordering {
    if k >= 0 {
        num.cmp(&(den << k as u64))
    } else {
        (num << (-k) as u64).cmp(den)
    }
}

fn scale_pow2(mut value: f64, mut exp: i64) -> f64 {
    while exp > 1000 && value.is_finite() {
        value *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 && value != 0.0 {
        value *= 2f64.powi(-1000);
        exp += 1000;
    }
    value * 2f64.powi(exp as i32)
}
