//! Vigil proxy server library logic.
//!
//! The server holds the upstream API keys and exposes the narrow set of
//! endpoints the prayer page calls: generation, voice selection, speech
//! synthesis and a read-only environment probe.

pub mod api;
pub mod api_speech;
pub mod config;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Extension, Json, Router,
};
use config::Config;
use middleware::RateLimiter;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use vigil_upstream::{ChatGateway, SpeechGateway};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat-completion client for Groq and OpenAI.
    pub chat: ChatGateway,
    /// Speech client for OpenAI and Google.
    pub speech: SpeechGateway,
    /// Rate limiter state.
    pub rate_limiter: RateLimiter,
    /// Requests allowed per client IP per minute.
    pub requests_per_minute: u32,
    /// Reported by `GET /api/env`.
    pub environment: String,
    /// Origins allowed to call the API cross-origin.
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chat: ChatGateway::new(config.upstream.clone()),
            speech: SpeechGateway::new(config.upstream.clone()),
            rate_limiter: RateLimiter::new(),
            requests_per_minute: config.rate_limit.requests_per_minute,
            environment: config.app.environment.clone(),
            cors_origins: config.server.cors_origins.clone(),
        }
    }
}

/// Maximum request body size (1 MiB). Every endpoint takes a small JSON body.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/prayer", post(api::prayer_handler))
        .route("/api/groq", post(api::groq_handler))
        .route("/api/audio", post(api_speech::audio_handler))
        .route("/api/google-tts", post(api_speech::google_tts_handler))
        .route("/api/env", get(api::env_handler))
        .route_layer(axum::middleware::from_fn(middleware::rate_limit_middleware));

    let router = Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http());

    let router = match cors_layer(&state.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(Extension(Arc::new(state)))
}
