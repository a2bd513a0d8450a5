mod common;

use axum::http::StatusCode;
use common::{json_of, post_json, post_raw, send, spawn_upstream, state, Keys};
use serde_json::json;
use tower::ServiceExt;
use vigil_server::app;

#[tokio::test]
async fn audio_streams_mpeg_bytes() {
    let base = spawn_upstream().await;
    let request = post_json(
        "/api/audio",
        json!({
            "model": "tts-1",
            "voice": "nova",
            "input": "主啊，求你賜我平安。",
            "response_format": "mp3",
            "instructions": "Tone: calm"
        }),
    );
    let response = app(state(&base, Keys::all())).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "audio/mpeg");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.as_ref(), b"ID3fake-mp3");
}

#[tokio::test]
async fn audio_with_blank_input_is_bad_request() {
    let base = spawn_upstream().await;
    let request = post_json("/api/audio", json!({ "voice": "alloy", "input": "   " }));
    let (status, _) = send(app(state(&base, Keys::all())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn audio_without_input_field_is_json_bad_request() {
    let base = spawn_upstream().await;
    let request = post_json("/api/audio", json!({ "voice": "nova" }));
    let (status, body) = send(app(state(&base, Keys::all())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json_of(&body)["error"].as_str().unwrap().to_string();
    assert!(error.contains("input"), "{error}");
}

#[tokio::test]
async fn audio_with_unknown_voice_is_json_bad_request() {
    let base = spawn_upstream().await;
    let request = post_json("/api/audio", json!({ "input": "Amen.", "voice": "baritone" }));
    let (status, body) = send(app(state(&base, Keys::all())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json_of(&body)["error"].as_str().unwrap().to_string();
    assert!(error.contains("baritone"), "{error}");
}

#[tokio::test]
async fn google_tts_with_plain_text_body_is_json_bad_request() {
    let base = spawn_upstream().await;
    let request = post_raw("/api/google-tts", "text/plain", "阿們");
    let (status, body) = send(app(state(&base, Keys::all())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_of(&body)["error"].is_string());
}

#[tokio::test]
async fn audio_upstream_failure_is_json_error() {
    let base = spawn_upstream().await;
    let request = post_json("/api/audio", json!({ "voice": "alloy", "input": "FAIL" }));
    let (status, body) = send(app(state(&base, Keys::all())), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_of(&body);
    assert_eq!(json["error"], "TTS API error");
    assert_eq!(json["detail"], "speech offline");
}

#[tokio::test]
async fn google_tts_returns_base64_audio() {
    let base = spawn_upstream().await;
    let request = post_json("/api/google-tts", json!({ "text": "阿們" }));
    let (status, body) = send(app(state(&base, Keys::all())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({ "audioContent": "SUQzZmFrZQ==" }));
}

#[tokio::test]
async fn google_tts_blank_text_is_bad_request() {
    let base = spawn_upstream().await;
    let request = post_json("/api/google-tts", json!({ "text": "" }));
    let (status, body) = send(app(state(&base, Keys::all())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_of(&body)["error"].is_string());
}

#[tokio::test]
async fn google_tts_missing_audio_is_server_error() {
    let base = spawn_upstream().await;
    let request = post_json("/api/google-tts", json!({ "text": "silent" }));
    let (status, body) = send(app(state(&base, Keys::all())), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_of(&body)["error"], "No audioContent in TTS response.");
}

#[tokio::test]
async fn google_tts_without_key_is_server_error() {
    let base = spawn_upstream().await;
    let request = post_json("/api/google-tts", json!({ "text": "阿們" }));
    let (status, body) = send(app(state(&base, Keys::none())), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_of(&body)["error"], "GOOGLE_TTS_API_KEY not set in environment.");
}
