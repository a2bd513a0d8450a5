//! Generation handlers for the prayer proxy.

use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use vigil_core::compose_user_prompt;
use vigil_types::{EnvInfo, ErrorEnvelope, GenerationRequest};
use vigil_upstream::{ChatProvider, UpstreamError};

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    /// The upstream call failed; `detail` carries what the upstream said.
    #[error("{error}")]
    Upstream {
        error: String,
        detail: Option<String>,
    },
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    /// Maps an upstream failure, labelling it with the service that failed
    /// (e.g. "Groq API", "Google TTS").
    pub fn from_upstream(service: &str, err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidInput(msg) => ApiError::BadRequest(msg),
            UpstreamError::MissingCredentials(name) => {
                ApiError::InternalServerError(format!("{name} not set in environment."))
            }
            UpstreamError::Status { status, body } => ApiError::Upstream {
                error: format!("{service} error"),
                detail: Some(if body.trim().is_empty() {
                    format!("status {status}")
                } else {
                    body
                }),
            },
            UpstreamError::Network(e) => ApiError::Upstream {
                error: format!("{service} call failed"),
                detail: Some(e.to_string()),
            },
            UpstreamError::InvalidResponse(msg) => ApiError::Upstream {
                error: format!("{service} call failed"),
                detail: Some(msg),
            },
            UpstreamError::MissingAudio => {
                ApiError::InternalServerError("No audioContent in TTS response.".to_string())
            }
        }
    }
}

/// Bodies that are not JSON or do not fit the request type are the
/// caller's fault and get the same envelope as any other bad request.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope {
                    error: msg,
                    detail: None,
                },
            ),
            ApiError::Upstream { error, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope { error, detail },
            ),
            ApiError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope {
                    error: msg,
                    detail: None,
                },
            ),
        };

        (status, Json(envelope)).into_response()
    }
}

async fn relay(
    state: &AppState,
    provider: ChatProvider,
    service: &str,
    req: &GenerationRequest,
) -> Result<Json<Value>, ApiError> {
    let prompt = compose_user_prompt(req)
        .ok_or_else(|| ApiError::BadRequest("Missing content, emotion, or topic.".to_string()))?;

    let envelope = state
        .chat
        .complete(provider, &prompt)
        .await
        .map_err(|e| {
            tracing::warn!(%provider, error = %e, "generation failed");
            ApiError::from_upstream(service, e)
        })?;

    Ok(Json(envelope))
}

/// Handler for `POST /api/prayer`.
///
/// Uses Groq when its key is set and OpenAI otherwise.
pub async fn prayer_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let provider = state.chat.preferred_provider().ok_or_else(|| {
        ApiError::InternalServerError("No API key set in environment.".to_string())
    })?;

    relay(&state, provider, "API", &req).await
}

/// Handler for `POST /api/groq`.
pub async fn groq_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    if !state.chat.is_configured(ChatProvider::Groq) {
        return Err(ApiError::InternalServerError(
            "Groq API key not set in environment.".to_string(),
        ));
    }

    relay(&state, ChatProvider::Groq, "Groq API", &req).await
}

/// Handler for `GET /api/env`.
pub async fn env_handler(Extension(state): Extension<Arc<AppState>>) -> Json<EnvInfo> {
    Json(EnvInfo {
        node_env: state.environment.clone(),
    })
}
