//! Wallet module - backend wallet lock handling
//!
//! The backend (bitcoind or compatible) owns the wallet. This module only
//! checks whether it is locked and, if needed, asks the backend to unlock it
//! for a short window.
//!
//! # Unlock flow
//!
//! ```text
//! getinfo ──► unlocked_until absent ───────────► success
//!         ├─► unlocked_until > 0 ──────────────► success
//!         └─► unlocked_until <= 0 ─┬─ no passphrase ─► failure "locked"
//!                                  └─ walletpassphrase [pass, 60]
//!                                        ├─ error absent/null ─► success
//!                                        └─ error set / failed ─► failure
//! ```

mod unlock;

pub use unlock::{LockState, UnlockError, WalletUnlockResult, WalletUnlocker};
