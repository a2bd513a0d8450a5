//! Speech voice definitions.
//!
//! The speech gateway exposes six fixed voices. Anything the model or a
//! caller sends outside that set is rejected at decode time, and every
//! segment always carries a concrete voice: [`Voice::Alloy`] when nothing
//! better is known.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voices offered by the speech synthesis gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// Balanced and warm, suitable for general use.
    #[default]
    Alloy,
    /// More dynamic, adds excitement.
    Echo,
    /// Storytelling voice.
    Fable,
    /// Deep and rich, authoritative.
    Onyx,
    /// Bright and cheerful.
    Nova,
    /// Soft and soothing.
    Shimmer,
}

impl Voice {
    /// All voices, in the order they are presented to the selection model.
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    /// Returns the lowercase token used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = ParseVoiceError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alloy" => Ok(Self::Alloy),
            "echo" => Ok(Self::Echo),
            "fable" => Ok(Self::Fable),
            "onyx" => Ok(Self::Onyx),
            "nova" => Ok(Self::Nova),
            "shimmer" => Ok(Self::Shimmer),
            _ => Err(ParseVoiceError(s.to_string())),
        }
    }
}

/// Error returned when a voice token is not one of the six known voices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown voice: {0}")]
pub struct ParseVoiceError(pub String);

/// A voice plus optional delivery guidance for the speech gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoiceChoice {
    pub voice: Voice,
    /// Free-form delivery guidance. Empty when none is available.
    #[serde(default)]
    pub instructions: String,
}

impl VoiceChoice {
    pub fn new(voice: Voice, instructions: impl Into<String>) -> Self {
        Self {
            voice,
            instructions: instructions.into(),
        }
    }
}
