//! Shared test fixtures: a scripted RPC transport and temp-dir configs.

#![allow(dead_code)]

use darkpoold::{ConfigFile, ConfigOverrides, RpcResponse, RpcTransport, RuntimeConfig, TransportError};
use serde_json::{Map, Value};
use std::sync::Mutex;
use tempfile::TempDir;

pub const GETINFO: &str = "getinfo";
pub const WALLET_PASSPHRASE: &str = "walletpassphrase";

/// Replies to `getinfo` and `walletpassphrase` from fixed scripts and records
/// every call.
pub struct StubTransport {
    status: Result<RpcResponse, String>,
    unlock: Option<Result<RpcResponse, String>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl StubTransport {
    /// `getinfo` answers with `status` as its result.
    pub fn with_status(status: Value) -> Self {
        Self { status: Ok(RpcResponse::ok(status)), unlock: None, calls: Mutex::new(Vec::new()) }
    }

    /// `getinfo` fails at the transport level.
    pub fn unreachable(reason: &str) -> Self {
        Self { status: Err(reason.to_string()), unlock: None, calls: Mutex::new(Vec::new()) }
    }

    /// `getinfo` answers with a full envelope.
    pub fn with_status_envelope(envelope: Value) -> Self {
        Self { status: Ok(RpcResponse::new(object(envelope))), unlock: None, calls: Mutex::new(Vec::new()) }
    }

    /// `walletpassphrase` answers with `envelope` verbatim.
    pub fn unlock_replies(mut self, envelope: Value) -> Self {
        self.unlock = Some(Ok(RpcResponse::new(object(envelope))));
        self
    }

    /// `walletpassphrase` fails at the transport level.
    pub fn unlock_fails(mut self, reason: &str) -> Self {
        self.unlock = Some(Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }
}

impl RpcTransport for StubTransport {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, TransportError> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).push((method.to_string(), params));
        let scripted = match method {
            GETINFO => Some(&self.status),
            WALLET_PASSPHRASE => self.unlock.as_ref(),
            _ => None,
        };
        match scripted {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(TransportError::Http(reason.clone())),
            None => panic!("unexpected rpc call: {method}"),
        }
    }
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Config in a fresh temp data dir with GUI credentials set.
pub fn temp_config(user: &str, password: &str) -> (TempDir, RuntimeConfig) {
    let dir = TempDir::new().expect("tempdir");
    let overrides = ConfigOverrides::new().with_data_dir(dir.path()).with_gui_auth(user, password);
    let config = RuntimeConfig::resolve_with(&overrides, &ConfigFile::empty()).expect("config");
    (dir, config)
}
