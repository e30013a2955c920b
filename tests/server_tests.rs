//! GUI API routes driven in-process through the router

#![cfg(feature = "server")]

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::{temp_config, StubTransport};
use darkpoold::{create_router_with_transport, Credentials, RpcResponse, RpcTransport, TransportError};
use serde_json::{json, Value};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const USER: &str = "xcpgui";
const PASSWORD: &str = "gui-secret";

fn router(transport: StubTransport) -> (TempDir, Router) {
    let (dir, config) = temp_config(USER, PASSWORD);
    (dir, create_router_with_transport(Arc::new(config), Arc::new(transport)))
}

fn auth(user: &str, password: &str) -> String {
    Credentials { user: user.into(), password: password.into() }.to_basic_header()
}

fn get(path: &str, authorization: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_unlock(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/wallet/unlock")
        .header(header::AUTHORIZATION, auth(USER, PASSWORD))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn health_with_valid_credentials() {
    let (_dir, app) = router(StubTransport::with_status(json!({})));
    let (status, body) = send(app, get("/health", Some(auth(USER, PASSWORD)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let (_dir, app) = router(StubTransport::with_status(json!({})));
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
    assert!(challenge.to_str().unwrap().starts_with("Basic"));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (_dir, app) = router(StubTransport::with_status(json!({})));
    let (status, body) = send(app, get("/health", Some(auth(USER, "nope")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn malformed_header_is_rejected() {
    let (_dir, app) = router(StubTransport::with_status(json!({})));
    let (status, _) = send(app, get("/health", Some("Bearer abc".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Config
// ============================================================================

#[tokio::test]
async fn config_summary_omits_passwords() {
    let (_dir, app) = router(StubTransport::with_status(json!({})));
    let (status, body) = send(app, get("/config", Some(auth(USER, PASSWORD)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gui_user"], USER);
    assert_eq!(body["gui_password_set"], true);
    assert_eq!(body["complete"], true);
    assert!(!body.to_string().contains(PASSWORD));
}

// ============================================================================
// Wallet unlock
// ============================================================================

#[tokio::test]
async fn unlock_when_no_lock() {
    let (_dir, app) = router(StubTransport::with_status(json!({"balance": 0})));
    let (status, body) = send(app, post_unlock(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn unlock_locked_without_passphrase() {
    let (_dir, app) = router(StubTransport::with_status(json!({"unlocked_until": 0})));
    let (status, body) = send(app, post_unlock(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unlock_locked_with_passphrase() {
    let transport = StubTransport::with_status(json!({"unlocked_until": 0})).unlock_replies(json!({"error": null}));
    let (_dir, app) = router(transport);
    let (status, body) = send(app, post_unlock(json!({"passphrase": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn unlock_reports_bad_gateway_when_backend_is_down() {
    let (_dir, app) = router(StubTransport::unreachable("connection refused"));
    let (status, body) = send(app, post_unlock(json!({"passphrase": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unlock_requires_credentials() {
    let (_dir, app) = router(StubTransport::with_status(json!({})));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/wallet/unlock")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Holds every call until released and reports each one as it arrives.
struct GatedTransport {
    entered: tokio::sync::mpsc::UnboundedSender<()>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl RpcTransport for GatedTransport {
    fn call(&self, _method: &str, _params: Vec<Value>) -> Result<RpcResponse, TransportError> {
        let _ = self.entered.send(());
        let _ = self.release.lock().unwrap_or_else(|p| p.into_inner()).recv();
        Ok(RpcResponse::ok(json!({})))
    }
}

#[tokio::test]
async fn cancelled_unlock_still_serializes_backend_calls() {
    let (entered_tx, mut entered) = tokio::sync::mpsc::unbounded_channel();
    let (release, release_rx) = mpsc::channel();
    let (_dir, config) = temp_config(USER, PASSWORD);
    let transport = GatedTransport { entered: entered_tx, release: Mutex::new(release_rx) };
    let app = create_router_with_transport(Arc::new(config), Arc::new(transport));

    let first = tokio::spawn(app.clone().oneshot(post_unlock(json!({}))));
    entered.recv().await.unwrap();
    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());

    // first backend call is still running
    let second = tokio::spawn(app.clone().oneshot(post_unlock(json!({}))));
    let overlap = tokio::time::timeout(Duration::from_millis(200), entered.recv()).await;
    assert!(overlap.is_err(), "second unlock reached the backend concurrently");

    release.send(()).unwrap();
    entered.recv().await.unwrap();
    release.send(()).unwrap();
    let response = second.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
