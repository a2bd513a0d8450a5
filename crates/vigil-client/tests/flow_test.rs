use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use vigil_client::{ClientError, FlowOutcome, PrayerFlow, ProxyClient};
use vigil_core::{SectionLabels, SessionError, SessionState, MAX_SEGMENTS};
use vigil_types::Voice;

fn completion(content: &str) -> Response {
    Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
        .into_response()
}

/// Stand-in for the proxy's `/api/groq` route.
///
/// Generation requests answer by emotion: "garbled" gets an unstructured
/// reply flagged with an error, "terse" an unstructured reply in a plain
/// envelope, "down" gets an upstream error, "flaky" fails after its first
/// segment, anything else a well-formed reply that echoes the requested
/// length. Voice selection succeeds only for 焦慮.
async fn groq(Json(body): Json<Value>) -> Response {
    if let Some(emotion) = body["emotion"].as_str() {
        let length = body["prayerLength"].as_u64().unwrap_or_default();
        let failing = emotion == "down" || (emotion == "flaky" && length > 120);
        if failing {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Groq API error", "detail": "quota" })),
            )
                .into_response();
        }
        return match emotion {
            "garbled" => Json(json!({
                "error": "content filtered",
                "detail": "reply truncated",
                "choices": [{ "message": { "content": "Peace be with you." } }]
            }))
            .into_response(),
            "terse" => completion("Amen."),
            _ => completion(&format!(
                "【經文】詩篇 23:1\n【解說】耶和華是我的牧者。\n【禱告】主啊，求你同在。length={length}"
            )),
        };
    }

    let content = body["content"].as_str().unwrap_or_default();
    if content.contains("焦慮") {
        completion("VOICE: nova\nINSTRUCTIONS:\nTone: gentle")
    } else {
        (StatusCode::BAD_GATEWAY, "voice model offline").into_response()
    }
}

async fn audio(Json(body): Json<Value>) -> Response {
    let voice = body["voice"].as_str().unwrap_or_default().to_string();
    (
        [("content-type", "audio/mpeg")],
        Bytes::from(format!("ID3:{voice}")),
    )
        .into_response()
}

async fn spawn_proxy() -> String {
    let app = Router::new()
        .route("/api/groq", post(groq))
        .route("/api/audio", post(audio));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn flow() -> PrayerFlow {
    let base = spawn_proxy().await;
    PrayerFlow::new(ProxyClient::new(&base), SectionLabels::default(), "zh-Hant")
}

#[tokio::test]
async fn first_segment_carries_selected_voice() {
    let mut flow = flow().await;

    let outcome = flow.start("焦慮").await.unwrap();
    let FlowOutcome::Segment(segment) = outcome else {
        panic!("expected a segment, got {outcome:?}");
    };

    assert_eq!(segment.sequence_number, 1);
    assert_eq!(segment.text, "主啊，求你同在。length=120");
    assert_eq!(segment.voice, Voice::Nova);
    assert_eq!(segment.instructions, "Tone: gentle");

    let passage = flow.session().passage().unwrap();
    assert_eq!(passage.scripture, "詩篇 23:1");
    assert_eq!(passage.explanation, "耶和華是我的牧者。");
    assert_eq!(flow.session().state(), SessionState::Ready);
}

#[tokio::test]
async fn voice_failure_falls_back_to_alloy() {
    let mut flow = flow().await;

    let FlowOutcome::Segment(segment) = flow.start("失眠").await.unwrap() else {
        panic!("generation should still succeed");
    };
    assert_eq!(segment.voice, Voice::Alloy);
    assert_eq!(segment.instructions, "");
}

#[tokio::test]
async fn four_rounds_use_growing_lengths_and_reach_the_cap() {
    let mut flow = flow().await;

    flow.start("焦慮").await.unwrap();
    for _ in 1..MAX_SEGMENTS {
        assert!(flow.session().actions().can_continue);
        flow.continue_topic().await.unwrap();
    }

    assert_eq!(flow.session().state(), SessionState::Complete);
    assert!(!flow.session().actions().can_continue);

    let lengths: Vec<String> = (1..=MAX_SEGMENTS)
        .map(|n| flow.session().segment(n).unwrap().text.clone())
        .map(|text| text.rsplit('=').next().unwrap().to_string())
        .collect();
    assert_eq!(lengths, ["120", "200", "250", "250"]);

    let err = flow.continue_topic().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Session(SessionError::SegmentLimitReached(4))
    ));
    assert_eq!(flow.session().segment_count(), MAX_SEGMENTS);
}

#[tokio::test]
async fn unstructured_reply_is_shown_raw() {
    let mut flow = flow().await;

    let outcome = flow.start("garbled").await.unwrap();
    assert_eq!(
        outcome,
        FlowOutcome::Unparsed {
            raw_text: "Peace be with you.".to_string(),
            diagnostic: Some("content filtered: reply truncated".to_string()),
        }
    );
    assert_eq!(flow.session().state(), SessionState::Idle);
    assert_eq!(flow.session().diagnostic(), Some("Peace be with you."));
    assert_eq!(flow.session().segment_count(), 0);
}

#[tokio::test]
async fn unstructured_reply_without_error_shows_envelope() {
    let mut flow = flow().await;

    let outcome = flow.start("terse").await.unwrap();
    let FlowOutcome::Unparsed {
        raw_text,
        diagnostic: Some(diagnostic),
    } = outcome
    else {
        panic!("expected an unparsed reply, got {outcome:?}");
    };
    assert_eq!(raw_text, "Amen.");
    let envelope: Value = serde_json::from_str(&diagnostic).unwrap();
    assert_eq!(envelope["choices"][0]["message"]["content"], "Amen.");
}

#[tokio::test]
async fn failed_first_segment_returns_to_idle() {
    let mut flow = flow().await;

    let outcome = flow.start("down").await.unwrap();
    let FlowOutcome::Failed { diagnostic } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(diagnostic.contains("Groq API error: quota"));
    assert_eq!(flow.session().state(), SessionState::Idle);
    assert_eq!(flow.session().emotion(), None);
}

#[tokio::test]
async fn failed_continue_keeps_existing_segments() {
    let mut flow = flow().await;
    flow.start("flaky").await.unwrap();
    let before = flow.session().segment(1).cloned();

    let outcome = flow.continue_topic().await.unwrap();
    assert!(matches!(outcome, FlowOutcome::Failed { .. }));
    assert_eq!(flow.session().state(), SessionState::Ready);
    assert_eq!(flow.session().segment_count(), 1);
    assert_eq!(flow.session().segment(1).cloned(), before);
    assert!(flow.session().actions().can_continue);
}

#[tokio::test]
async fn unreachable_proxy_is_a_failed_round() {
    let mut flow = PrayerFlow::new(
        ProxyClient::new("http://127.0.0.1:9"),
        SectionLabels::default(),
        "zh-Hant",
    );

    let outcome = flow.start("焦慮").await.unwrap();
    assert!(matches!(outcome, FlowOutcome::Failed { .. }));
    assert!(flow.session().diagnostic().is_some());
}

#[tokio::test]
async fn speak_uses_segment_voice() {
    let mut flow = flow().await;
    flow.start("焦慮").await.unwrap();

    let audio = flow.speak(1).await.unwrap().unwrap();
    assert_eq!(audio, b"ID3:nova");
    assert!(flow.speak(2).await.unwrap().is_none());
}
