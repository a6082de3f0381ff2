//! Smart-contract ABI value codec.
//!
//! Values returned by Klever VM views are flat hex strings whose layout is only known through
//! the contract ABI. This module parses ABI type strings, walks them recursively over a single
//! [`HexCursor`] and produces a [`DecodedValue`] tree. The encode direction covers the scalar
//! subset used when building call arguments.
//!
//! Entry point for most callers is [`VmOutputDecoder`]:
//!
//! ```no_run
//! use klever_sdk::abi::VmOutputDecoder;
//!
//! # fn main() -> Result<(), klever_sdk::abi::Error> {
//! let mut decoder = VmOutputDecoder::new();
//! decoder.load_abi(std::fs::File::open("example.abi.json").unwrap())?;
//! let value = decoder.decode_hex("list_int32", &["000000080000005700000065fffffffb"])?;
//! println!("{value}");
//! # Ok(())
//! # }
//! ```

use displaydoc::Display;
use thiserror::Error;

use crate::address;

pub mod big_float;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod scalar;
pub mod schema;
pub mod types;
pub mod value;

pub use big_float::BigFloat;
pub use cursor::HexCursor;
pub use decoder::{VmOutputDecoder, decode_type};
pub use encoder::{encode_input, encode_value};
pub use schema::{AbiSchema, Endpoint, TypeDef};
pub use types::{LeafType, TypeExpr};
pub use value::{DecodedValue, StructValue};

/// Represents errors raised while loading an ABI or encoding and decoding values.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// No ABI has been loaded into the decoder
    AbiNotLoaded,
    /// Failed to parse the ABI document: {0}
    InvalidAbi(String),
    /// Endpoint `{0}` not found in the ABI
    EndpointNotFound(String),
    /// Endpoint `{0}` declares no outputs
    EndpointWithoutOutputs(String),
    /// Endpoint `{endpoint}` has no output for payload #{index}
    UnexpectedPayload { endpoint: String, index: usize },
    /// Type `{0}` not found in the ABI types
    TypeNotFound(String),
    /// Not enough data: requested {requested} hex chars, {remaining} remaining
    CursorExhausted { requested: usize, remaining: usize },
    /// Invalid hex data `{0}`
    InvalidHex(String),
    /// Invalid base64 payload: {0}
    InvalidBase64(String),
    /// Unsupported type `{0}`
    UnsupportedType(String),
    /// Malformed type string `{0}`
    MalformedType(String),
    /// Invalid big float encoding: {0}
    InvalidBigFloat(String),
    /// Invalid value: {0}
    InvalidValue(String),
    /// Invalid address: {0}
    Address(#[from] address::Error),
    /// {context}: {source}
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps the error with a breadcrumb describing what was being decoded.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every context layer.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Adds breadcrumb context to fallible decode steps.
pub(crate) trait ResultExt<T> {
    fn context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> ResultExt<T> for Result<T, Error> {
    fn context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.context(f()))
    }
}
