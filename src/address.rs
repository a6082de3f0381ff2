use std::fmt;
use std::str::FromStr;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use displaydoc::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Human-readable prefix of Klever addresses.
pub const KLV_HRP: Hrp = Hrp::parse_unchecked("klv");
/// Length of a raw address in bytes.
pub const ADDRESS_LEN: usize = 32;

/// Represents errors that can occur while parsing addresses.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid hex address `{0}`
    InvalidHex(String),
    /// Invalid address length: expected {expected} bytes, got {got}
    InvalidLength { expected: usize, got: usize },
    /// Invalid bech32 address `{0}`
    InvalidBech32(String),
    /// Address `{0}` does not use the `klv` prefix
    InvalidPrefix(String),
}

/// A 32-byte Klever account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: ADDRESS_LEN,
            got: bytes.len(),
        })?;
        Ok(Self(raw))
    }

    pub fn from_hex(hex_address: &str) -> Result<Self, Error> {
        let bytes =
            hex::decode(hex_address).map_err(|_| Error::InvalidHex(hex_address.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parses a `klv1...` address. Only the original bech32 checksum is accepted.
    pub fn from_bech32(address: &str) -> Result<Self, Error> {
        let checked = CheckedHrpstring::new::<Bech32>(address)
            .map_err(|_| Error::InvalidBech32(address.to_string()))?;
        if checked.hrp() != KLV_HRP {
            return Err(Error::InvalidPrefix(address.to_string()));
        }
        let data = checked.byte_iter().collect::<Vec<_>>();
        Self::from_bytes(&data)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn to_bech32(&self) -> String {
        self.to_string()
    }

    /// Smart contract addresses start with eight zero bytes.
    pub fn is_smart_contract(&self) -> bool {
        self.0[..8].iter().all(|b| *b == 0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = bech32::encode::<Bech32>(KLV_HRP, &self.0).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
