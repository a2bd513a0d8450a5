//! Navigation through emotion lists.
//!
//! Each list ends with a sentinel "other situation" entry. Picking the
//! sentinel asks for a further list until it has been picked
//! [`FREE_TEXT_THRESHOLD`] times, after which the user is offered a
//! free-text box instead. Lists are kept as history so the page can go back.

/// Sentinel picks after which free-text input replaces another list.
pub const FREE_TEXT_THRESHOLD: u32 = 3;

/// What the caller should do after an entry is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStep {
    /// A real emotion was picked; start a topic with it.
    Topic(String),
    /// Fetch another list and hand it to [`EmotionCatalog::push_list`].
    FetchMore,
    /// Show the free-text input.
    FreeText,
}

#[derive(Debug, Clone)]
pub struct EmotionCatalog {
    sentinel: String,
    history: Vec<Vec<String>>,
    sentinel_picks: u32,
}

impl EmotionCatalog {
    /// Creates a catalog showing `initial`, terminated by `sentinel`.
    pub fn new(initial: Vec<String>, sentinel: impl Into<String>) -> Self {
        let sentinel = sentinel.into();
        let first = terminate(initial, &sentinel);
        Self {
            sentinel,
            history: vec![first],
            sentinel_picks: 0,
        }
    }

    /// The list currently shown.
    pub fn current(&self) -> &[String] {
        self.history.last().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn is_sentinel(&self, label: &str) -> bool {
        label.trim() == self.sentinel.trim()
    }

    pub fn sentinel_picks(&self) -> u32 {
        self.sentinel_picks
    }

    pub fn select(&mut self, label: &str) -> CatalogStep {
        if !self.is_sentinel(label) {
            return CatalogStep::Topic(label.trim().to_string());
        }

        self.sentinel_picks += 1;
        if self.sentinel_picks >= FREE_TEXT_THRESHOLD {
            CatalogStep::FreeText
        } else {
            CatalogStep::FetchMore
        }
    }

    /// Shows a freshly fetched list.
    pub fn push_list(&mut self, list: Vec<String>) {
        let list = terminate(list, &self.sentinel);
        self.history.push(list);
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    /// Returns to the previous list. Returns `false` if already at the first.
    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.history.pop();
        if self.history.len() == 1 {
            self.sentinel_picks = 0;
        } else {
            self.sentinel_picks = self.sentinel_picks.saturating_sub(1);
        }
        true
    }

    /// Drops all history and shows `initial` again.
    pub fn reset(&mut self, initial: Vec<String>) {
        self.history = vec![terminate(initial, &self.sentinel)];
        self.sentinel_picks = 0;
    }
}

fn terminate(mut list: Vec<String>, sentinel: &str) -> Vec<String> {
    list.retain(|label| !label.trim().is_empty() && label.trim() != sentinel.trim());
    list.push(sentinel.to_string());
    list
}
