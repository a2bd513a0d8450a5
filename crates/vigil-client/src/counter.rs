//! Best-effort usage counter.
//!
//! The counter endpoint is optional. It is probed once; if the probe fails
//! every later call is skipped for the rest of the session. Counter errors
//! are logged and never reach the caller.

use crate::proxy::ProxyClient;
use vigil_types::{UsageAction, UsageCount, UsageEvent};

pub const COUNTER_PATH: &str = "/api/counter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStatus {
    Unprobed,
    Enabled,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct UsageCounter {
    http: reqwest::Client,
    url: String,
    status: CounterStatus,
}

impl UsageCounter {
    pub fn new(proxy: &ProxyClient) -> Self {
        Self {
            http: proxy.http().clone(),
            url: proxy.url(COUNTER_PATH),
            status: CounterStatus::Unprobed,
        }
    }

    pub fn status(&self) -> CounterStatus {
        self.status
    }

    pub fn is_enabled(&self) -> bool {
        self.status == CounterStatus::Enabled
    }

    /// Checks the endpoint once. Later calls return the cached result.
    pub async fn probe(&mut self) -> bool {
        if self.status != CounterStatus::Unprobed {
            return self.is_enabled();
        }

        self.status = match self.http.get(&self.url).send().await {
            Ok(response) if response.status().is_success() => CounterStatus::Enabled,
            Ok(response) => {
                tracing::info!(
                    status = response.status().as_u16(),
                    "usage counter unavailable, disabling"
                );
                CounterStatus::Disabled
            }
            Err(e) => {
                tracing::info!(error = %e, "usage counter unreachable, disabling");
                CounterStatus::Disabled
            }
        };
        self.is_enabled()
    }

    pub async fn record_visit(&mut self, language: &str) -> Option<u64> {
        self.record(UsageAction::Visit, language).await
    }

    pub async fn record_audio(&mut self, language: &str) -> Option<u64> {
        self.record(UsageAction::Audio, language).await
    }

    /// Posts one event and returns the new count, or `None` when the
    /// counter is disabled or the call failed.
    pub async fn record(&mut self, action: UsageAction, language: &str) -> Option<u64> {
        if !self.probe().await {
            tracing::debug!(?action, "usage counter disabled, skipping");
            return None;
        }

        let event = UsageEvent {
            action,
            language: language.to_string(),
        };
        let response = match self.http.post(&self.url).json(&event).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(?action, error = %e, "failed to record usage");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(?action, status = response.status().as_u16(), "failed to record usage");
            return None;
        }

        match response.json::<UsageCount>().await {
            Ok(count) => Some(count.count),
            Err(e) => {
                tracing::warn!(?action, error = %e, "unreadable usage count");
                None
            }
        }
    }
}
