//! Speech synthesis handlers.

use crate::api::ApiError;
use crate::AppState;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Extension, Json},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use vigil_types::{GoogleSpeechRequest, GoogleSpeechResponse, SpeechRequest};

/// Handler for `POST /api/audio`.
///
/// Streams the OpenAI speech body through as it arrives.
pub async fn audio_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let upstream = state.speech.synthesize_openai(&req).await.map_err(|e| {
        tracing::warn!(voice = %req.voice, error = %e, "speech synthesis failed");
        ApiError::from_upstream("TTS API", e)
    })?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("audio/mpeg"));

    let body = Body::from_stream(upstream.bytes_stream());
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// Handler for `POST /api/google-tts`.
pub async fn google_tts_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<GoogleSpeechRequest>, JsonRejection>,
) -> Result<Json<GoogleSpeechResponse>, ApiError> {
    let Json(req) = payload?;
    let audio_content = state.speech.synthesize_google(&req).await.map_err(|e| {
        tracing::warn!(language = %req.language_code, error = %e, "google speech failed");
        ApiError::from_upstream("Google TTS", e)
    })?;

    Ok(Json(GoogleSpeechResponse { audio_content }))
}
