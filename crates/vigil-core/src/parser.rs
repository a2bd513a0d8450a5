//! Splitting a model reply into scripture, explanation and prayer.
//!
//! The model is asked for three labelled sections but does not always
//! comply, so the reply goes through an ordered list of strategies and the
//! first one that recovers all three fields wins. Outputs are never merged
//! across strategies.
//!
//! Only the bracketed-header strategy uses the localized labels. The
//! markdown and keyword fallbacks match the source-language (Traditional
//! Chinese) markers regardless of the page language.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Bold marker and keyword for the prayer section.
pub const PRAYER_KEYWORD: &str = "禱告";
/// Bold marker and keyword for the scripture section.
pub const SCRIPTURE_KEYWORD: &str = "聖經經文";
/// Bold marker and keyword for the explanation section.
pub const EXPLANATION_KEYWORD: &str = "簡短解說";

static MD_PRAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\*\*禱告\*\*\s*[:：]?(.*?)\*\*聖經經文\*\*").expect("valid prayer pattern")
});
static MD_SCRIPTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\*\*聖經經文\*\*\s*[:：]?(.*?)\*\*簡短解說\*\*")
        .expect("valid scripture pattern")
});
static MD_EXPLANATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\*\*簡短解說\*\*\s*[:：]?(.*)").expect("valid explanation pattern")
});

/// Localized section-header labels, as they appear between `【` and `】`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLabels {
    scripture: String,
    explanation: String,
    prayer: String,
}

impl SectionLabels {
    /// Builds labels, dropping a trailing `:` or `：` from each.
    pub fn new(
        scripture: impl AsRef<str>,
        explanation: impl AsRef<str>,
        prayer: impl AsRef<str>,
    ) -> Self {
        Self {
            scripture: normalize_label(scripture.as_ref()),
            explanation: normalize_label(explanation.as_ref()),
            prayer: normalize_label(prayer.as_ref()),
        }
    }

    pub fn scripture(&self) -> &str {
        &self.scripture
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn prayer(&self) -> &str {
        &self.prayer
    }
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self::new("經文", "解說", "禱告")
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().trim_end_matches([':', '：']).trim().to_string()
}

/// The three sections of a successfully parsed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub scripture: String,
    pub explanation: String,
    pub prayer: String,
}

impl Passage {
    /// Trims each field; returns `None` if any field ends up empty.
    pub fn from_fields(scripture: &str, explanation: &str, prayer: &str) -> Option<Self> {
        let scripture = scripture.trim();
        let explanation = explanation.trim();
        let prayer = prayer.trim();
        if scripture.is_empty() || explanation.is_empty() || prayer.is_empty() {
            return None;
        }
        Some(Self {
            scripture: scripture.to_string(),
            explanation: explanation.to_string(),
            prayer: prayer.to_string(),
        })
    }
}

/// Outcome of parsing one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    Parsed(Passage),
    /// No strategy matched. `raw_text` is the reply exactly as received.
    Unparsed {
        raw_text: String,
        diagnostic: Option<String>,
    },
}

impl ParseResult {
    /// Attaches upstream error details to an `Unparsed` result.
    pub fn with_diagnostic(self, diagnostic: impl Into<String>) -> Self {
        match self {
            Self::Unparsed { raw_text, .. } => Self::Unparsed {
                raw_text,
                diagnostic: Some(diagnostic.into()),
            },
            parsed => parsed,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// A single parsing strategy.
pub type Strategy = fn(&str, &SectionLabels) -> Option<Passage>;

/// Strategies in the order they are tried.
pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("bracketed-header", bracketed_headers),
    ("markdown-bold", markdown_bold),
    ("keyword-offset", keyword_offsets),
];

/// Parses a reply with the first strategy that recovers all three sections.
pub fn parse_reply(raw_text: &str, labels: &SectionLabels) -> ParseResult {
    for (name, strategy) in STRATEGIES {
        if let Some(passage) = strategy(raw_text, labels) {
            tracing::debug!(strategy = name, "parsed model reply");
            return ParseResult::Parsed(passage);
        }
    }

    tracing::debug!(len = raw_text.len(), "no strategy matched model reply");
    ParseResult::Unparsed {
        raw_text: raw_text.to_string(),
        diagnostic: None,
    }
}

/// `【scripture】…【explanation】…【prayer】…` using the localized labels.
pub fn bracketed_headers(raw_text: &str, labels: &SectionLabels) -> Option<Passage> {
    let header = |label: &str| format!("【{}】", regex::escape(label));
    let scripture_h = header(labels.scripture());
    let explanation_h = header(labels.explanation());
    let prayer_h = header(labels.prayer());

    let scripture_re = Regex::new(&format!("(?s){scripture_h}(.*?){explanation_h}")).ok()?;
    let explanation_re = Regex::new(&format!("(?s){explanation_h}(.*?){prayer_h}")).ok()?;
    let prayer_re = Regex::new(&format!("(?s){prayer_h}(.*)")).ok()?;

    let scripture = capture(&scripture_re, raw_text)?;
    let explanation = capture(&explanation_re, raw_text)?;
    let prayer = capture(&prayer_re, raw_text)?;

    Passage::from_fields(scripture, explanation, prayer)
}

/// `**禱告** … **聖經經文** … **簡短解說** …` in that order.
pub fn markdown_bold(raw_text: &str, _labels: &SectionLabels) -> Option<Passage> {
    let prayer = capture(&MD_PRAYER, raw_text)?;
    let scripture = capture(&MD_SCRIPTURE, raw_text)?;
    let explanation = capture(&MD_EXPLANATION, raw_text)?;

    Passage::from_fields(scripture, explanation, prayer)
}

/// Slices between the first occurrences of the three source-language
/// keywords. The keywords must appear in prayer, scripture, explanation
/// order; anything else is treated as no match.
pub fn keyword_offsets(raw_text: &str, _labels: &SectionLabels) -> Option<Passage> {
    let prayer_at = raw_text.find(PRAYER_KEYWORD)?;
    let scripture_at = raw_text.find(SCRIPTURE_KEYWORD)?;
    let explanation_at = raw_text.find(EXPLANATION_KEYWORD)?;

    let prayer_start = prayer_at + PRAYER_KEYWORD.len();
    let scripture_start = scripture_at + SCRIPTURE_KEYWORD.len();
    let explanation_start = explanation_at + EXPLANATION_KEYWORD.len();

    if prayer_start > scripture_at || scripture_start > explanation_at {
        return None;
    }

    Passage::from_fields(
        &raw_text[scripture_start..explanation_at],
        &raw_text[explanation_start..],
        &raw_text[prayer_start..scripture_at],
    )
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
