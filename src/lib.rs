// # Klever SDK
//!
//! A Rust SDK for querying smart contracts on the [Klever](https://klever.org) blockchain and
//! decoding the values their views return.
//!
//! Contract views answer with flat hex (or base64) payloads. Their layout is only described by
//! the contract ABI, a JSON document listing each endpoint's output types and the fields of every
//! user-defined struct. The [`abi`] module turns those payloads into [`DecodedValue`] trees:
//!
//! ```no_run
//! use klever_sdk::abi::VmOutputDecoder;
//!
//! # fn main() -> Result<(), klever_sdk::abi::Error> {
//! let mut decoder = VmOutputDecoder::new();
//! decoder.load_abi(&include_bytes!("../tests/fixtures/example.abi.json")[..])?;
//! let value = decoder.decode_hex("option_i8", &["0152"])?;
//! assert_eq!(value.to_string(), "Some(82)");
//! # Ok(())
//! # }
//! ```
//!
//! # Querying a node
//!
//! - Use [`VmQueryBuilder`] to describe the view call and its arguments.
//! - Use [`KleverClient`] to send it to a node, either through `/vm/hex` (one hex payload) or
//!   `/vm/query` (one base64 payload per returned value), and decode the answer in one step.
//! - Use [`encode_input`](abi::encode_input) to build `@arg1@arg2` call data from `type:value`
//!   strings.

pub use abi::{DecodedValue, VmOutputDecoder};
pub use address::Address;
pub use client::KleverClient;
pub use network::{Network, NetworkConfig};
pub use vm::{VmQueryBuilder, VmValueRequest};

/// Module for the smart-contract ABI codec.
/// Parses ABI type strings and converts VM output payloads into typed values, and back.
pub mod abi;

/// Module for Klever addresses.
/// Converts between raw 32-byte addresses and their `klv1...` bech32 form.
pub mod address;

/// Module for the Klever node client.
/// Sends VM view queries over HTTP and decodes their results.
pub mod client;

/// Module for network selection.
pub mod network;

/// Module for VM query requests and responses.
pub mod vm;
