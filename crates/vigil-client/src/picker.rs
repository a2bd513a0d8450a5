//! Emotion lists fetched through the proxy.
//!
//! Wraps an [`EmotionCatalog`] and fetches whatever list it asks for.
//! Fetches never fail: the caller-supplied fallback list stands in for any
//! list the proxy cannot produce.

use crate::proxy::ProxyClient;
use vigil_core::{CatalogStep, EmotionCatalog};

/// Context sent when the sentinel entry asks for a further list.
pub const MORE_EMOTIONS_CONTEXT: &str = "需要不同於之前的情緒狀態";

pub struct EmotionPicker {
    proxy: ProxyClient,
    catalog: EmotionCatalog,
    first_visit_prompt: String,
    fallback: Vec<String>,
}

impl EmotionPicker {
    /// Fetches the first list with `first_visit_prompt`.
    pub async fn load(
        proxy: ProxyClient,
        first_visit_prompt: impl Into<String>,
        fallback: Vec<String>,
        sentinel: impl Into<String>,
    ) -> Self {
        let first_visit_prompt = first_visit_prompt.into();
        let first = proxy.fetch_emotions(&first_visit_prompt, &fallback).await;
        Self {
            proxy,
            catalog: EmotionCatalog::new(first, sentinel),
            first_visit_prompt,
            fallback,
        }
    }

    pub fn catalog(&self) -> &EmotionCatalog {
        &self.catalog
    }

    pub fn current(&self) -> &[String] {
        self.catalog.current()
    }

    /// Handles a picked entry. On [`CatalogStep::FetchMore`] the new list is
    /// already current when this returns.
    pub async fn pick(&mut self, label: &str) -> CatalogStep {
        let step = self.catalog.select(label);
        if step == CatalogStep::FetchMore {
            let list = self
                .proxy
                .fetch_emotions(MORE_EMOTIONS_CONTEXT, &self.fallback)
                .await;
            tracing::debug!(
                labels = list.len(),
                picks = self.catalog.sentinel_picks(),
                "showing further emotions"
            );
            self.catalog.push_list(list);
        }
        step
    }

    pub fn back(&mut self) -> bool {
        self.catalog.back()
    }

    /// Drops the history and fetches the first list again.
    pub async fn reset(&mut self) {
        let first = self
            .proxy
            .fetch_emotions(&self.first_visit_prompt, &self.fallback)
            .await;
        self.catalog.reset(first);
    }
}
