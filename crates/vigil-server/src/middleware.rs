use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::AppState;

const WINDOW: Duration = Duration::from_secs(60);

/// Entries beyond which expired windows are evicted.
const EVICTION_THRESHOLD: usize = 10_000;

/// In-memory per-IP rate limiter.
///
/// Uses a simple fixed window counter.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    state: Arc<Mutex<HashMap<IpAddr, (u32, Instant)>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the request is allowed.
    ///
    /// Returns `true` if allowed, `false` if limit exceeded.
    pub fn check(&self, ip: IpAddr, limit: u32) -> bool {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("rate limiter lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        };
        let now = Instant::now();

        // Evict only expired windows so active limits survive the sweep.
        if state.len() > EVICTION_THRESHOLD {
            state.retain(|_, (_, start)| now.duration_since(*start) <= WINDOW);
        }

        let (count, start) = state.entry(ip).or_insert((0, now));

        if now.duration_since(*start) > WINDOW {
            *count = 1;
            *start = now;
            true
        } else {
            *count += 1;
            *count <= limit
        }
    }
}

/// Rejects callers that exceed the configured requests per minute with
/// `429 Too Many Requests`.
pub async fn rate_limit_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .clone();

    // Missing ConnectInfo means the server was started without
    // `into_make_service_with_connect_info`. Misconfiguration should be fixed.
    let ip = match req.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => addr.ip(),
        None => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    };

    if !state.rate_limiter.check(ip, state.requests_per_minute) {
        tracing::debug!(%ip, path = req.uri().path(), "rate limit exceeded");
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from_static("60"));
        return Ok(response);
    }

    Ok(next.run(req).await)
}
