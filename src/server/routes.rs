//! HTTP routes for the GUI API

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::Credentials;
use crate::config::{ConfigSummary, RuntimeConfig};
use crate::core::paths::{routes, APP_NAME};
use crate::rpc::{HttpTransport, RpcTransport};
use crate::runtime::Shutdown;
use crate::wallet::{WalletUnlockResult, WalletUnlocker};

type SharedTransport = Arc<dyn RpcTransport + Send + Sync>;
type ApiError = (StatusCode, Json<Value>);

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<RuntimeConfig>,
    transport: SharedTransport,
    /// One unlock attempt at a time against the backend.
    unlock_guard: Arc<Mutex<()>>,
}

impl ApiState {
    pub fn new(config: Arc<RuntimeConfig>, transport: SharedTransport) -> Self {
        Self { config, transport, unlock_guard: Arc::new(Mutex::new(())) }
    }
}

/// Router talking to the backend at the resolved RPC endpoint.
pub fn create_router(config: Arc<RuntimeConfig>) -> Router {
    let transport: SharedTransport = Arc::new(HttpTransport::from_config(&config));
    create_router_with_transport(config, transport)
}

pub fn create_router_with_transport(config: Arc<RuntimeConfig>, transport: SharedTransport) -> Router {
    let state = ApiState::new(config, transport);
    Router::new()
        .route(routes::HEALTH, get(health))
        .route(routes::CONFIG, get(config_summary))
        .route(routes::WALLET_UNLOCK, post(wallet_unlock))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `gui_host:gui_port` and serve until `shutdown` triggers.
pub async fn serve(config: Arc<RuntimeConfig>, shutdown: Shutdown) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.gui_host, config.gui_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("GUI API listening on http://{}", addr);

    axum::serve(listener, create_router(config))
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}

async fn require_auth(State(s): State<ApiState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(Credentials::from_basic_header)
        .is_some_and(|c| c.matches(&s.config));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, format!("Basic realm=\"{APP_NAME}\""))],
            Json(json!({"error": "unauthorized"})),
        )
            .into_response();
    }
    next.run(request).await
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": APP_NAME}))
}

async fn config_summary(State(s): State<ApiState>) -> Json<ConfigSummary> {
    Json(s.config.summary())
}

#[derive(Debug, Default, Deserialize)]
struct UnlockRequest {
    #[serde(default)]
    passphrase: Option<String>,
}

async fn wallet_unlock(
    State(s): State<ApiState>,
    Json(payload): Json<UnlockRequest>,
) -> Result<Json<WalletUnlockResult>, ApiError> {
    // Owned by the blocking task: held until the backend calls finish, even if
    // the request is dropped.
    let guard = s.unlock_guard.clone().lock_owned().await;
    let transport = s.transport.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        WalletUnlocker::new(transport).unlock(payload.passphrase.as_deref())
    })
    .await
    .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, format!("unlock task: {e}")))?;

    match outcome {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            warn!(error = %e, "wallet status unavailable");
            Err(error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

fn error(status: StatusCode, message: String) -> ApiError {
    (status, Json(json!({"error": message})))
}
