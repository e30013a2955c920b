//! GUI-facing HTTP API
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/health` | GET | `{status, service}` |
//! | `/config` | GET | Resolved config, passwords omitted |
//! | `/wallet/unlock` | POST | `{passphrase?}` → `{success, message}` |
//!
//! Every route requires HTTP Basic auth matching the GUI user and password.

mod routes;

pub use routes::{create_router, create_router_with_transport, serve, ApiState};
