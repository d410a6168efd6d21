//! Axum service: the form page, the predict endpoint, and JSON status
//! endpoints.
//!
//! The model is loaded once at startup and shared read-only behind an `Arc`;
//! every request is stateless. A failed form submission returns a plain-text
//! `Error: <message>` body; nothing is partially rendered.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anemia_core::{diet_recommendations, explain, Model};
use anyhow::{Context, Result};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::forms::{parse_record, FormError};
use crate::pages;

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<Model>,
    pub model_hash: String,
    pub start_time: Instant,
    pub req_count: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(model: Model) -> Result<Self> {
        let model_hash = model.hash_hex().context("failed to hash model")?;
        Ok(Self {
            model: Arc::new(model),
            model_hash,
            start_time: Instant::now(),
            req_count: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn record_request(&self) -> u64 {
        self.req_count.fetch_add(1, Ordering::Relaxed) as u64 + 1
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    model_hash: String,
    trees: usize,
    req_total: u64,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    version: &'static str,
}

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let shared = Arc::new(state);
    let app = build_router(shared);

    let socket_addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid listen address {addr}"))?;
    let listener = tokio::net::TcpListener::bind(socket_addr)
        .await
        .with_context(|| format!("failed to bind listener on {socket_addr}"))?;
    info!("Listening on {socket_addr}");

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .route("/version", get(handle_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_index(State(state): State<SharedState>) -> Html<String> {
    state.record_request();
    Html(pages::index_page())
}

async fn handle_predict(
    State(state): State<SharedState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.record_request();

    match render_prediction(&state, &form) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            warn!("prediction request failed: {err}");
            (StatusCode::BAD_REQUEST, format!("Error: {err}")).into_response()
        }
    }
}

/// Parse -> classify -> explain -> recommend -> render, in that order
fn render_prediction(
    state: &AppState,
    form: &HashMap<String, String>,
) -> Result<String, FormError> {
    let record = parse_record(form)?;
    let features = record.to_features();

    let prediction = if state.model.predict_at_risk(&features) {
        "At Risk of Anemia"
    } else {
        "Not at Risk"
    };

    let explanation = explain::explain(&state.model, &features);
    let top_text = explanation.top_text(3);
    let recommendations = diet_recommendations(&record);

    Ok(pages::result_page(prediction, &top_text, &recommendations))
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let req_total = state.record_request();
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_seconds(),
        model_hash: state.model_hash.clone(),
        trees: state.model.num_trees(),
        req_total,
    })
}

async fn handle_version(State(state): State<SharedState>) -> Json<VersionResponse> {
    state.record_request();
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}
