//! Decoding the voice-selection model's free-text answer.
//!
//! The answer is expected to contain a `VOICE: <token>` line and, when a
//! prayer text was supplied, an `INSTRUCTIONS:` block. Anything that does
//! not decode to one of the six known voices yields the default choice.

use regex::Regex;
use std::sync::LazyLock;
use vigil_types::{Voice, VoiceChoice};

static VOICE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)VOICE:\s*(\w+)").expect("valid voice pattern"));
static INSTRUCTIONS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)INSTRUCTIONS:\s*(.+)").expect("valid instructions pattern")
});

/// Decodes a voice-selection answer.
///
/// `with_instructions` should be true when the request carried a prayer
/// text; otherwise any `INSTRUCTIONS:` block is ignored.
pub fn decode_voice_reply(answer: &str, with_instructions: bool) -> VoiceChoice {
    let Some(token) = VOICE_LINE
        .captures(answer)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        tracing::warn!("voice selection answer has no VOICE line, using default voice");
        return VoiceChoice::default();
    };

    let voice = match token.parse::<Voice>() {
        Ok(voice) => voice,
        Err(e) => {
            tracing::warn!(token, "voice selection returned an invalid voice: {}", e);
            return VoiceChoice::default();
        }
    };

    let instructions = if with_instructions {
        INSTRUCTIONS_BLOCK
            .captures(answer)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    } else {
        String::new()
    };

    VoiceChoice::new(voice, instructions)
}
