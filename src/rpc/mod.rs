//! Backend JSON-RPC - transport contract and response shape handling.
//!
//! The backend's JSON schema is not under our control, so fields are read as
//! [`Field`]: absent, present-but-null, or present with a value.

mod http;

pub use http::{HttpTransport, DEFAULT_TIMEOUT};

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http: {0}")]
    Http(String),
    #[error("decode response: {0}")]
    Decode(String),
    #[error("rpc error from backend: {0}")]
    Rpc(Value),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Sends one JSON-RPC request and returns the decoded response object.
pub trait RpcTransport {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, TransportError>;
}

impl<T: RpcTransport + ?Sized> RpcTransport for &T {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, TransportError> {
        (**self).call(method, params)
    }
}

impl<T: RpcTransport + ?Sized> RpcTransport for Box<T> {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, TransportError> {
        (**self).call(method, params)
    }
}

impl<T: RpcTransport + ?Sized> RpcTransport for std::sync::Arc<T> {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, TransportError> {
        (**self).call(method, params)
    }
}

/// A JSON object field as observed on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Absent,
    Null,
    Value(&'a Value),
}

impl<'a> Field<'a> {
    pub fn of(object: &'a Map<String, Value>, key: &str) -> Self {
        match object.get(key) {
            None => Field::Absent,
            Some(Value::Null) => Field::Null,
            Some(value) => Field::Value(value),
        }
    }

    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Field::Value(v) => Some(v),
            Field::Absent | Field::Null => None,
        }
    }
}

/// Decoded JSON-RPC response envelope (`result`, `error`, `id`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcResponse(Map<String, Value>);

impl RpcResponse {
    pub fn new(object: Map<String, Value>) -> Self { Self(object) }

    /// Successful reply carrying `result`.
    pub fn ok(result: Value) -> Self {
        let mut object = Map::new();
        object.insert("result".into(), result);
        object.insert("error".into(), Value::Null);
        Self(object)
    }

    /// Failed reply carrying `error`.
    pub fn err(error: Value) -> Self {
        let mut object = Map::new();
        object.insert("result".into(), Value::Null);
        object.insert("error".into(), error);
        Self(object)
    }

    pub fn field(&self, key: &str) -> Field<'_> { Field::of(&self.0, key) }

    pub fn error(&self) -> Field<'_> { self.field("error") }

    /// The `result` object, or the backend error / shape problem.
    pub fn into_result_object(self) -> Result<Map<String, Value>, TransportError> {
        if let Some(error) = self.error().value() {
            return Err(TransportError::Rpc(error.clone()));
        }
        let mut object = self.0;
        match object.remove("result") {
            Some(Value::Object(result)) => Ok(result),
            Some(other) => Err(TransportError::Malformed(format!("result is not an object: {other}"))),
            None => Err(TransportError::Malformed("missing result".into())),
        }
    }
}
