use displaydoc::Display;
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abi;
use crate::abi::LeafType;
use crate::address::Address;

/// Represents errors recorded while building a VM query.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// The query has no function name
    MissingFunction,
    /// The query has no contract address
    MissingAddress,
    /// Invalid hex argument `{0}`
    InvalidHexArgument(String),
    /// Byte arguments must contain at least one byte
    EmptyBytesArgument,
    /// Failed to encode argument: {0}
    Encode(#[from] abi::Error),
}

/// Request body of the node `/vm/hex` and `/vm/query` routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmValueRequest {
    /// Bech32 address of the contract.
    #[serde(rename = "scAddress")]
    pub sc_address: String,
    #[serde(rename = "funcName")]
    pub func_name: String,
    #[serde(rename = "caller", default, skip_serializing_if = "String::is_empty")]
    pub caller: String,
    /// Call value in the smallest unit, as a decimal string.
    #[serde(rename = "value", default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Hex-encoded arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Builds a [`VmValueRequest`].
///
/// Setters never fail. The first invalid input is recorded and returned by
/// [`to_request`](Self::to_request).
#[derive(Debug, Default)]
pub struct VmQueryBuilder {
    address: Option<Address>,
    caller: Option<Address>,
    function: String,
    value: Option<BigUint>,
    args: Vec<String>,
    err: Option<Error>,
}

impl VmQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the view to call.
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    /// Sets the contract address.
    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn caller_address(mut self, address: Address) -> Self {
        self.caller = Some(address);
        self
    }

    pub fn call_value(mut self, value: BigUint) -> Self {
        self.value = Some(value);
        self
    }

    /// Adds an already hex-encoded argument.
    pub fn arg_hex(mut self, hexed: &str) -> Self {
        if hex::decode(hexed).is_ok() {
            self.args.push(hexed.to_ascii_lowercase());
        } else {
            self.record(Error::InvalidHexArgument(hexed.to_string()));
        }
        self
    }

    pub fn arg_address(mut self, address: &Address) -> Self {
        self.args.push(address.to_hex());
        self
    }

    pub fn arg_big_int(self, value: &BigInt) -> Self {
        let encoded = abi::encode_value(&LeafType::BigInt, &value.to_string(), false);
        self.push_encoded(encoded)
    }

    pub fn arg_big_uint(self, value: &BigUint) -> Self {
        let encoded = abi::encode_value(&LeafType::BigUint, &value.to_string(), false);
        self.push_encoded(encoded)
    }

    /// Adds an integer in its shortest two's-complement form.
    pub fn arg_i64(self, value: i64) -> Self {
        let encoded = abi::encode_value(&LeafType::I64, &value.to_string(), false);
        self.push_encoded(encoded)
    }

    /// Adds raw bytes. The slice must not be empty.
    pub fn arg_bytes(mut self, bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            self.record(Error::EmptyBytesArgument);
        } else {
            self.args.push(hex::encode(bytes));
        }
        self
    }

    pub fn arg_string(mut self, value: &str) -> Self {
        self.args.push(hex::encode(value));
        self
    }

    /// Returns the request, or the first error recorded by a setter.
    pub fn to_request(self) -> Result<VmValueRequest, Error> {
        if let Some(err) = self.err {
            return Err(err);
        }
        if self.function.is_empty() {
            return Err(Error::MissingFunction);
        }
        let address = self.address.ok_or(Error::MissingAddress)?;

        Ok(VmValueRequest {
            sc_address: address.to_bech32(),
            func_name: self.function,
            caller: self.caller.map(|c| c.to_bech32()).unwrap_or_default(),
            value: self.value.map(|v| v.to_string()).unwrap_or_default(),
            args: self.args,
        })
    }

    fn push_encoded(mut self, encoded: Result<String, abi::Error>) -> Self {
        match encoded {
            Ok(arg) => self.args.push(arg),
            Err(e) => self.record(e.into()),
        }
        self
    }

    fn record(&mut self, err: Error) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }
}

/// Response of the `/vm/hex` route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmHexResponse {
    #[serde(default)]
    pub data: VmHexData,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmHexData {
    #[serde(default)]
    pub data: String,
}

/// Response of the `/vm/query` route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmQueryResponse {
    #[serde(default)]
    pub data: VmQueryData,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmQueryData {
    #[serde(default)]
    pub data: VmOutput,
}

/// Output of a VM view execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmOutput {
    /// Base64-encoded return values, one per output payload.
    #[serde(default)]
    pub return_data: Vec<String>,
    #[serde(default)]
    pub return_code: String,
    #[serde(default)]
    pub return_message: String,
}

impl VmOutput {
    pub const RETURN_CODE_OK: &'static str = "Ok";

    pub fn is_ok(&self) -> bool {
        self.return_code == Self::RETURN_CODE_OK
    }
}
