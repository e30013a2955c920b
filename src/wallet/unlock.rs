//! WalletUnlocker - status query, conditional unlock, uniform result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::core::paths::methods;
use crate::core::protocol::UNLOCK_WINDOW_SECS;
use crate::rpc::{Field, RpcTransport, TransportError};

const UNLOCKED_UNTIL: &str = "unlocked_until";

pub const MSG_UNLOCKED: &str = "wallet unlocked";
pub const MSG_LOCKED: &str = "wallet locked, passphrase required";
pub const MSG_INVALID_PASSPHRASE: &str = "invalid passphrase";
pub const MSG_REQUEST_FAILED: &str = "unlock request failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletUnlockResult {
    pub success: bool,
    pub message: String,
}

impl WalletUnlockResult {
    pub fn unlocked() -> Self {
        Self { success: true, message: MSG_UNLOCKED.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UnlockError {
    #[error("wallet status query failed: {0}")]
    Status(#[from] TransportError),
    #[error("malformed wallet status: unlocked_until = {0}")]
    MalformedStatus(Value),
}

/// Wallet lock state as reported by the status query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LockState {
    /// Backend has no lock concept (unencrypted wallet).
    NoLock,
    Unlocked { until: f64 },
    Locked,
}

impl LockState {
    pub fn from_status(status: &Map<String, Value>) -> Result<Self, UnlockError> {
        match Field::of(status, UNLOCKED_UNTIL) {
            Field::Absent | Field::Null => Ok(LockState::NoLock),
            Field::Value(value) => match value.as_f64() {
                Some(until) if until > 0.0 => Ok(LockState::Unlocked { until }),
                Some(_) => Ok(LockState::Locked),
                None => Err(UnlockError::MalformedStatus(value.clone())),
            },
        }
    }

    pub fn is_usable(&self) -> bool {
        !matches!(self, LockState::Locked)
    }
}

/// Drives the unlock handshake against one backend. Callers serialize
/// concurrent unlock attempts per backend.
#[derive(Debug, Clone)]
pub struct WalletUnlocker<T> {
    transport: T,
}

impl<T: RpcTransport> WalletUnlocker<T> {
    pub fn new(transport: T) -> Self { Self { transport } }

    pub fn transport(&self) -> &T { &self.transport }

    /// Status query. Any failure here propagates.
    pub fn lock_state(&self) -> Result<LockState, UnlockError> {
        let status = self.transport.call(methods::GET_INFO, vec![])?.into_result_object()?;
        let state = LockState::from_status(&status)?;
        debug!(?state, "wallet status");
        Ok(state)
    }

    /// Unlock if locked. Expected backend outcomes are reported in the result;
    /// only a failed status query is an error.
    pub fn unlock(&self, passphrase: Option<&str>) -> Result<WalletUnlockResult, UnlockError> {
        if self.lock_state()?.is_usable() {
            return Ok(WalletUnlockResult::unlocked());
        }
        let Some(passphrase) = passphrase else {
            info!("wallet locked and no passphrase supplied");
            return Ok(WalletUnlockResult::failed(MSG_LOCKED));
        };
        Ok(self.request_unlock(passphrase))
    }

    fn request_unlock(&self, passphrase: &str) -> WalletUnlockResult {
        let params = vec![json!(passphrase), json!(UNLOCK_WINDOW_SECS)];
        match self.transport.call(methods::WALLET_PASSPHRASE, params) {
            Ok(response) => match response.error() {
                Field::Absent | Field::Null => {
                    info!(window_secs = UNLOCK_WINDOW_SECS, "wallet unlocked");
                    WalletUnlockResult::unlocked()
                }
                Field::Value(error) => {
                    warn!(code = ?error.get("code"), "backend rejected wallet passphrase");
                    WalletUnlockResult::failed(MSG_INVALID_PASSPHRASE)
                }
            },
            Err(e) => {
                warn!(error = %e, "wallet unlock request failed");
                WalletUnlockResult::failed(MSG_REQUEST_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn lock_state_from_status_shapes() {
        assert_eq!(LockState::from_status(&status(json!({}))).unwrap(), LockState::NoLock);
        assert_eq!(LockState::from_status(&status(json!({"unlocked_until": null}))).unwrap(), LockState::NoLock);
        assert_eq!(
            LockState::from_status(&status(json!({"unlocked_until": 120}))).unwrap(),
            LockState::Unlocked { until: 120.0 }
        );
        assert_eq!(LockState::from_status(&status(json!({"unlocked_until": 0}))).unwrap(), LockState::Locked);
        assert_eq!(LockState::from_status(&status(json!({"unlocked_until": -5}))).unwrap(), LockState::Locked);
        assert!(matches!(
            LockState::from_status(&status(json!({"unlocked_until": "soon"}))),
            Err(UnlockError::MalformedStatus(_))
        ));
    }

    #[test]
    fn result_serializes_flat() {
        let value = serde_json::to_value(WalletUnlockResult::failed(MSG_LOCKED)).unwrap();
        assert_eq!(value, json!({"success": false, "message": MSG_LOCKED}));
    }
}
