use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use vigil_client::{CounterStatus, ProxyClient, UsageCounter};

#[derive(Default)]
struct Hits {
    missing: AtomicUsize,
    count: AtomicU64,
}

async fn spawn(with_counter: bool) -> (String, Arc<Hits>) {
    let hits = Arc::new(Hits::default());

    let router: Router<Arc<Hits>> = if with_counter {
        Router::new().route(
            "/api/counter",
            get(|State(hits): State<Arc<Hits>>| async move {
                Json(json!({ "count": hits.count.load(Ordering::SeqCst) }))
            })
            .post(
                |State(hits): State<Arc<Hits>>, Json(body): Json<Value>| async move {
                    assert!(body["action"] == "visit" || body["action"] == "audio");
                    let count = hits.count.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!({ "count": count }))
                },
            ),
        )
    } else {
        Router::new().fallback(|State(hits): State<Arc<Hits>>| async move {
            hits.missing.fetch_add(1, Ordering::SeqCst);
            StatusCode::NOT_FOUND
        })
    };
    let app = router.with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

#[tokio::test]
async fn missing_endpoint_disables_counter_after_one_probe() {
    let (base, hits) = spawn(false).await;
    let mut counter = UsageCounter::new(&ProxyClient::new(&base));

    assert_eq!(counter.record_visit("zh-Hant").await, None);
    assert_eq!(counter.status(), CounterStatus::Disabled);
    assert_eq!(counter.record_audio("zh-Hant").await, None);
    assert_eq!(counter.record_visit("en").await, None);

    // Only the probe reached the server.
    assert_eq!(hits.missing.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn available_endpoint_counts_events() {
    let (base, hits) = spawn(true).await;
    let mut counter = UsageCounter::new(&ProxyClient::new(&base));

    assert!(counter.probe().await);
    assert_eq!(counter.record_visit("zh-Hant").await, Some(1));
    assert_eq!(counter.record_audio("zh-Hant").await, Some(2));
    assert_eq!(hits.count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_counter_is_disabled_silently() {
    let mut counter = UsageCounter::new(&ProxyClient::new("http://127.0.0.1:9"));
    assert!(!counter.probe().await);
    assert_eq!(counter.record_visit("zh-Hant").await, None);
}
