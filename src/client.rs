use std::time::Duration;

use bon::bon;
use displaydoc::Display;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::abi::{self, DecodedValue, VmOutputDecoder};
use crate::network::{self, NetworkConfig};
use crate::vm::{VmHexResponse, VmOutput, VmQueryResponse, VmValueRequest};

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const VM_HEX_PATH: &str = "vm/hex";
const VM_QUERY_PATH: &str = "vm/query";

/// Represents errors that can occur while talking to a Klever node.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Failed to send the request: {0}
    RequestError(String),
    /// Failed to deserialize the node response: {0}
    ResponseDeserializationError(String),
    /// Node returned an error: {0}
    NodeError(String),
    /// VM execution failed with code `{code}`: {message}
    VmError { code: String, message: String },
    /// Invalid node endpoint: {0}
    Network(#[from] network::Error),
    /// Failed to decode the VM output: {0}
    Decode(#[from] abi::Error),
}

/// An HTTP client for Klever node VM views.
#[derive(Debug, Clone)]
pub struct KleverClient {
    http: reqwest::Client,
    network: NetworkConfig,
}

#[bon]
impl KleverClient {
    /// Creates a new builder for `KleverClient` for the given network.
    #[builder(finish_fn = build)]
    pub fn builder(network: NetworkConfig, timeout: Option<Duration>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| Error::RequestError(e.to_string()))?;
        Ok(Self { http, network })
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Runs a view through `/vm/hex` and returns its output as one hex string.
    pub async fn query_vm_hex(&self, request: &VmValueRequest) -> Result<String, Error> {
        let response: VmHexResponse = self.post(VM_HEX_PATH, request).await?;
        if !response.error.is_empty() {
            return Err(Error::NodeError(response.error));
        }
        Ok(response.data.data)
    }

    /// Runs a view through `/vm/query` and returns the raw VM output.
    pub async fn query_vm(&self, request: &VmValueRequest) -> Result<VmOutput, Error> {
        let response: VmQueryResponse = self.post(VM_QUERY_PATH, request).await?;
        if !response.error.is_empty() {
            return Err(Error::NodeError(response.error));
        }
        let output = response.data.data;
        if !output.is_ok() {
            return Err(Error::VmError {
                code: output.return_code,
                message: output.return_message,
            });
        }
        Ok(output)
    }

    /// Runs a view through `/vm/hex` and decodes it against the endpoint named by the request.
    pub async fn query_and_decode_hex(
        &self,
        decoder: &VmOutputDecoder,
        request: &VmValueRequest,
    ) -> Result<DecodedValue, Error> {
        let hex = self.query_vm_hex(request).await?;
        Ok(decoder.decode_hex(&request.func_name, &[hex])?)
    }

    /// Runs a view through `/vm/query` and decodes every returned payload.
    pub async fn query_and_decode(
        &self,
        decoder: &VmOutputDecoder,
        request: &VmValueRequest,
    ) -> Result<DecodedValue, Error> {
        let output = self.query_vm(request).await?;
        Ok(decoder.decode_query(&request.func_name, &output.return_data)?)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.network.node_endpoint(path)?;
        log::debug!("POST {url} - Body: {body:?}");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::RequestError(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::RequestError(e.to_string()))?;
        log::debug!("Response ({status}): {text}");
        serde_json::from_str(&text).map_err(|e| {
            log::debug!("Deserialization error: {e}, response text: {text}");
            Error::ResponseDeserializationError(format!("{e} (HTTP {status})"))
        })
    }
}
