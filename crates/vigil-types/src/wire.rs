//! JSON bodies exchanged between the page, the proxy and the upstream APIs.
//!
//! Field names follow the browser contract (camelCase) so that the page and
//! the proxy can share one definition.

use crate::voice::Voice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language used when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "zh-Hant";

/// Language code used for Google speech when the caller omits one.
pub const DEFAULT_SPEECH_LANGUAGE_CODE: &str = "zh-TW";

/// Body of `POST /api/prayer` and `POST /api/groq`.
///
/// Exactly one of `content`, `emotion` or `topic` is meaningful per call;
/// the proxy checks them in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prayer_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl GenerationRequest {
    /// A devotional request for one emotional topic.
    pub fn for_emotion(emotion: impl Into<String>, language: impl Into<String>, length: u32) -> Self {
        Self {
            emotion: Some(emotion.into()),
            current_language: Some(language.into()),
            prayer_length: Some(length),
            ..Self::default()
        }
    }

    /// A short-topic request. The page also uses it to ask for emotion lists.
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }

    /// A request whose prompt is passed through verbatim.
    pub fn for_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Reply to an emotion-list request: `{"result": [...]}` or
/// `{"result": "a b c"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmotionListReply {
    pub result: EmotionList,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EmotionList {
    Labels(Vec<String>),
    /// Space separated labels.
    Text(String),
}

impl EmotionList {
    pub fn into_labels(self) -> Vec<String> {
        match self {
            EmotionList::Labels(labels) => labels,
            EmotionList::Text(text) => text.split(' ').map(str::to_string).collect(),
        }
    }
}

/// Body the page sends to the Groq endpoint when asking for a voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prayer_text: Option<String>,
}

/// OpenAI-shaped body of `POST /api/audio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    #[serde(default = "default_speech_model")]
    pub model: String,
    #[serde(default)]
    pub voice: Voice,
    pub input: String,
    #[serde(default = "default_response_format")]
    pub response_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl SpeechRequest {
    /// Builds an mp3 request; empty instructions are omitted from the body.
    pub fn new(input: impl Into<String>, voice: Voice, instructions: &str) -> Self {
        Self {
            model: default_speech_model(),
            voice,
            input: input.into(),
            response_format: default_response_format(),
            instructions: (!instructions.trim().is_empty()).then(|| instructions.to_string()),
        }
    }
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_response_format() -> String {
    "mp3".to_string()
}

/// Body of `POST /api/google-tts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSpeechRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_speech_language_code")]
    pub language_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f32,
}

fn default_speech_language_code() -> String {
    DEFAULT_SPEECH_LANGUAGE_CODE.to_string()
}

fn default_speaking_rate() -> f32 {
    1.0
}

/// Response of `POST /api/google-tts`: base64-encoded mp3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSpeechResponse {
    pub audio_content: String,
}

/// Chat-completion envelope as returned by the upstream model and relayed by
/// the proxy. Only the fields the page reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletion {
    /// Content of the first choice, if present and non-blank.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Normalized failure body returned by every proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.error, detail),
            None => f.write_str(&self.error),
        }
    }
}

/// Event kinds recorded by the usage counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageAction {
    Visit,
    Audio,
}

/// Body of `POST` to the usage counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub action: UsageAction,
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCount {
    pub count: u64,
}

/// Response of `GET /api/env`. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvInfo {
    #[serde(rename = "NODE_ENV")]
    pub node_env: String,
}
