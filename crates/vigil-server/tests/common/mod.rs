#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower::ServiceExt;
use vigil_server::{config::Config, AppState};

async fn chat_completions(Json(body): Json<Value>) -> Response {
    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
    if prompt.contains("FAIL") {
        return (StatusCode::SERVICE_UNAVAILABLE, "model overloaded").into_response();
    }
    Json(json!({
        "id": "chatcmpl-1",
        "model": body["model"],
        "choices": [{ "message": { "role": "assistant", "content": format!("echo: {prompt}") } }]
    }))
    .into_response()
}

async fn speech(Json(body): Json<Value>) -> Response {
    if body["input"] == "FAIL" {
        return (StatusCode::BAD_GATEWAY, "speech offline").into_response();
    }
    ([("content-type", "audio/mpeg")], Bytes::from_static(b"ID3fake-mp3")).into_response()
}

async fn google(Json(body): Json<Value>) -> Response {
    if body["input"]["text"] == "silent" {
        return Json(json!({})).into_response();
    }
    Json(json!({ "audioContent": "SUQzZmFrZQ==" })).into_response()
}

/// Starts a stand-in for every upstream API and returns its base URL.
pub async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/chat/completions", post(chat_completions))
        .route("/audio/speech", post(speech))
        .route("/text:synthesize", post(google));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub struct Keys {
    pub groq: bool,
    pub openai: bool,
    pub google: bool,
}

impl Keys {
    pub fn all() -> Self {
        Self {
            groq: true,
            openai: true,
            google: true,
        }
    }

    pub fn none() -> Self {
        Self {
            groq: false,
            openai: false,
            google: false,
        }
    }
}

pub fn state(base: &str, keys: Keys) -> AppState {
    let mut config = Config::default();
    config.upstream = config.upstream.with_base_url(base);
    let key = |set: bool| if set { "test-key".to_string() } else { String::new() };
    config.upstream.groq_api_key = key(keys.groq);
    config.upstream.openai_api_key = key(keys.openai);
    config.upstream.google_tts_api_key = key(keys.google);
    config.app.environment = "test".to_string();
    AppState::from_config(&config)
}

pub fn client_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 40000)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(client_addr()));
    request
}

/// A POST whose body is sent as-is under the given content type.
pub fn post_raw(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(client_addr()));
    request
}

pub fn get(uri: &str) -> Request<Body> {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request.extensions_mut().insert(ConnectInfo(client_addr()));
    request
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

pub fn json_of(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap()
}
