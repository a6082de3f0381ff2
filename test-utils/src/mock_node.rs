//! In-process Klever node stub.
//!
//! Serves the `/vm/hex` and `/vm/query` routes with canned answers per view name and records
//! every request it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use klever_sdk::NetworkConfig;
use klever_sdk::vm::{VmHexData, VmHexResponse, VmOutput, VmQueryData, VmQueryResponse, VmValueRequest};
use tokio::task::JoinHandle;
use url::Url;
use warp::Filter;

const SUCCESSFUL: &str = "successful";
const INTERNAL_ISSUE: &str = "internal_issue";

#[derive(Debug, Clone)]
enum Answer {
    Hex(String),
    Query(Vec<String>),
    VmError { code: String, message: String },
}

#[derive(Debug, Default)]
struct NodeState {
    answers: HashMap<String, Answer>,
    requests: Mutex<Vec<VmValueRequest>>,
}

impl NodeState {
    fn record(&self, request: &VmValueRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
    }

    fn hex_response(&self, request: VmValueRequest) -> VmHexResponse {
        self.record(&request);
        match self.answers.get(&request.func_name) {
            Some(Answer::Hex(hex)) => VmHexResponse {
                data: VmHexData { data: hex.clone() },
                error: String::new(),
                code: SUCCESSFUL.to_string(),
            },
            Some(Answer::VmError { message, .. }) => VmHexResponse {
                error: message.clone(),
                code: INTERNAL_ISSUE.to_string(),
                ..Default::default()
            },
            _ => VmHexResponse {
                error: format!("function not found: {}", request.func_name),
                code: INTERNAL_ISSUE.to_string(),
                ..Default::default()
            },
        }
    }

    fn query_response(&self, request: VmValueRequest) -> VmQueryResponse {
        self.record(&request);
        let output = match self.answers.get(&request.func_name) {
            Some(Answer::Query(payloads)) => VmOutput {
                return_data: payloads.clone(),
                return_code: VmOutput::RETURN_CODE_OK.to_string(),
                return_message: String::new(),
            },
            Some(Answer::VmError { code, message }) => VmOutput {
                return_code: code.clone(),
                return_message: message.clone(),
                ..Default::default()
            },
            _ => {
                return VmQueryResponse {
                    error: format!("function not found: {}", request.func_name),
                    code: INTERNAL_ISSUE.to_string(),
                    ..Default::default()
                };
            }
        };
        VmQueryResponse {
            data: VmQueryData { data: output },
            error: String::new(),
            code: SUCCESSFUL.to_string(),
        }
    }
}

/// Canned answers for a [`MockNodeServer`].
#[derive(Debug, Default)]
pub struct MockNode {
    answers: HashMap<String, Answer>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `func` on `/vm/hex` with `hex`.
    pub fn with_hex(mut self, func: &str, hex: &str) -> Self {
        self.answers
            .insert(func.to_string(), Answer::Hex(hex.to_string()));
        self
    }

    /// Answer `func` on `/vm/query` with base64 `payloads`.
    pub fn with_query(mut self, func: &str, payloads: &[&str]) -> Self {
        self.answers.insert(
            func.to_string(),
            Answer::Query(payloads.iter().map(|p| p.to_string()).collect()),
        );
        self
    }

    /// Make `func` fail inside the VM.
    pub fn with_vm_error(mut self, func: &str, code: &str, message: &str) -> Self {
        self.answers.insert(
            func.to_string(),
            Answer::VmError {
                code: code.to_string(),
                message: message.to_string(),
            },
        );
        self
    }

    /// Binds an ephemeral local port and serves until the returned server is dropped.
    pub async fn start(self) -> Result<MockNodeServer> {
        let state = Arc::new(NodeState {
            answers: self.answers,
            requests: Mutex::default(),
        });

        let with_state = {
            let state = state.clone();
            warp::any().map(move || state.clone())
        };
        let hex = warp::post()
            .and(warp::path!("vm" / "hex"))
            .and(warp::body::json())
            .and(with_state.clone())
            .map(|request: VmValueRequest, state: Arc<NodeState>| {
                warp::reply::json(&state.hex_response(request))
            });
        let query = warp::post()
            .and(warp::path!("vm" / "query"))
            .and(warp::body::json())
            .and(with_state)
            .map(|request: VmValueRequest, state: Arc<NodeState>| {
                warp::reply::json(&state.query_response(request))
            });

        let (addr, server) =
            warp::serve(hex.or(query)).try_bind_ephemeral(([127, 0, 0, 1], 0))?;
        let handle = tokio::spawn(server);
        log::info!("Mock node listening on {addr}");

        Ok(MockNodeServer {
            addr,
            state,
            handle,
        })
    }
}

/// A running [`MockNode`].
pub struct MockNodeServer {
    addr: SocketAddr,
    state: Arc<NodeState>,
    handle: JoinHandle<()>,
}

impl MockNodeServer {
    pub fn url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("http://{}/", self.addr))?)
    }

    /// A network configuration pointing both node and API URLs at this server.
    pub fn network(&self) -> Result<NetworkConfig> {
        let url = self.url()?;
        Ok(NetworkConfig::custom(url.as_str(), url.as_str())?)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<VmValueRequest> {
        self.state
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Drop for MockNodeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
