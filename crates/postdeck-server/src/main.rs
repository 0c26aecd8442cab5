//! PostDeck Template Server
//!
//! Stores edit templates for the media edit form in a JSON file.
//!
//! ## Routes
//!
//! ```text
//! GET  /api/templates       built-in templates followed by saved ones
//! POST /api/templates       { "name": "...", "config": { ... } }
//! GET  /templates/defaults  built-in templates only
//! GET  /health              "ok"
//! ```
//!
//! Configured through `POSTDECK_ADDR` and `POSTDECK_TEMPLATE_STORE`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use postdeck_core::templates::{
    FileTemplateStore, Template, TemplateConfig, TemplateError, TemplateStore, default_templates,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

const DEFAULT_ADDR: &str = "0.0.0.0:3030";
const DEFAULT_STORE: &str = "data/templates.json";

/// Server configuration
#[derive(Debug, Clone)]
struct ServerConfig {
    addr: SocketAddr,
    store_path: PathBuf,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_vars(
            std::env::var("POSTDECK_ADDR").ok(),
            std::env::var("POSTDECK_TEMPLATE_STORE").ok(),
        )
    }

    fn from_vars(addr: Option<String>, store: Option<String>) -> Self {
        let default_addr = SocketAddr::from(([0, 0, 0, 0], 3030));
        let addr = match addr {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("Invalid POSTDECK_ADDR {raw:?} ({err}), using {DEFAULT_ADDR}");
                default_addr
            }),
            None => default_addr,
        };
        Self {
            addr,
            store_path: PathBuf::from(store.unwrap_or_else(|| DEFAULT_STORE.to_string())),
        }
    }
}

/// Shared application state
struct AppState {
    store: Mutex<FileTemplateStore>,
}

impl AppState {
    fn new(store: FileTemplateStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

/// Body of `POST /api/templates`
#[derive(Debug, Deserialize)]
struct NewTemplate {
    name: String,
    config: Value,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postdeck_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    info!("Template store: {}", config.store_path.display());
    let state = Arc::new(AppState::new(FileTemplateStore::new(config.store_path)));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("PostDeck template server listening on {}", config.addr);
    axum::serve(listener, app(state)).await
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/templates", get(list_templates).post(save_template))
        .route("/templates/defaults", get(builtin_templates))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn builtin_templates() -> Json<Vec<Template>> {
    Json(default_templates())
}

async fn list_templates(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.lock().await;
    match store.list() {
        Ok(templates) => Json(templates).into_response(),
        Err(err) => store_failure(err),
    }
}

async fn save_template(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some((name, config)) = parse_new_template(&body) else {
        return invalid_template();
    };
    let mut store = state.store.lock().await;
    match store.save(&name, config) {
        Ok(template) => Json(template).into_response(),
        Err(TemplateError::Rejected(_)) => invalid_template(),
        Err(err) => store_failure(err),
    }
}

/// A request needs a non-empty name and an object config.
fn parse_new_template(body: &[u8]) -> Option<(String, TemplateConfig)> {
    let request: NewTemplate = serde_json::from_slice(body).ok()?;
    if request.name.trim().is_empty() {
        return None;
    }
    let config = TemplateConfig::from_value(request.config).ok()?;
    Some((request.name, config))
}

fn invalid_template() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid template" })),
    )
        .into_response()
}

fn store_failure(err: TemplateError) -> Response {
    warn!("Template store error: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}
