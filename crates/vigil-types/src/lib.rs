//! Shared types for the Vigil devotional companion.
//!
//! Holds the voice enumeration and the JSON bodies exchanged between the
//! page, the proxy server and the upstream model and speech APIs. Every
//! other crate in the workspace depends on this one for cross-cutting
//! definitions, which keeps the dependency graph free of cycles.

pub mod voice;
pub mod wire;

pub use voice::{ParseVoiceError, Voice, VoiceChoice};
pub use wire::{
    ChatChoice, ChatCompletion, ChatMessage, EmotionList, EmotionListReply, EnvInfo,
    ErrorEnvelope, GenerationRequest, GoogleSpeechRequest, GoogleSpeechResponse, SpeechRequest,
    UsageAction, UsageCount, UsageEvent, VoiceSelectionRequest, DEFAULT_LANGUAGE,
    DEFAULT_SPEECH_LANGUAGE_CODE,
};
