//! HTTP JSON-RPC transport for bitcoind-style backends.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use super::{RpcResponse, RpcTransport, TransportError};
use crate::config::RuntimeConfig;
use crate::uri::ConnectionUri;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpTransport {
    uri: ConnectionUri,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(uri: ConnectionUri) -> Self {
        Self { uri, timeout: DEFAULT_TIMEOUT }
    }

    /// Transport against the resolved backend RPC endpoint.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.rpc_uri())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }

    pub fn uri(&self) -> &ConnectionUri { &self.uri }
}

impl RpcTransport for HttpTransport {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, TransportError> {
        // The blocking client owns a runtime and must not be dropped on an async
        // worker, so it lives only for the duration of one call.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(http_error)?;

        let payload = json!({
            "method": method,
            "params": params,
            "jsonrpc": "2.0",
            "id": 0,
        });
        debug!(method, endpoint = %self.uri.base_url(), "rpc call");

        // bitcoind reports RPC errors with a non-2xx status and a JSON body, so
        // the body is decoded regardless of status.
        let response = client
            .post(self.uri.base_url())
            .basic_auth(self.uri.user(), Some(self.uri.password()))
            .json(&payload)
            .send()
            .map_err(http_error)?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| TransportError::Decode(format!("{} (status {status})", e.without_url())))?;

        match body {
            Value::Object(object) => Ok(RpcResponse::new(object)),
            other => Err(TransportError::Malformed(format!("expected object, got {other}"))),
        }
    }
}

fn http_error(e: reqwest::Error) -> TransportError {
    TransportError::Http(e.without_url().to_string())
}
