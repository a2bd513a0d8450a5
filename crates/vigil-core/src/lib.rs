//! Core logic of the Vigil devotional companion.
//!
//! Everything here is synchronous and free of I/O:
//!
//! - [`parser`] splits a model reply into scripture, explanation and prayer.
//! - [`session`] tracks the prayer segments generated for one topic and
//!   decides which actions the page may offer.
//! - [`voice`] decodes the voice-selection model's answer.
//! - [`prompt`] composes the prompts sent upstream.
//! - [`catalog`] walks the emotion lists offered on the landing page.
//!
//! # Usage
//!
//! ```rust
//! use vigil_core::{parse_reply, ParseResult, PrayerSession, SectionLabels};
//! use vigil_types::VoiceChoice;
//!
//! let mut session = PrayerSession::new();
//! let ticket = session.start_topic("Anxiety").unwrap();
//!
//! let reply = "【經文】John 3:16\n【解說】God loves.\n【禱告】Amen.";
//! if let ParseResult::Parsed(passage) = parse_reply(reply, &SectionLabels::default()) {
//!     session
//!         .on_generation_succeeded(&ticket, passage, VoiceChoice::default())
//!         .unwrap();
//! }
//! assert_eq!(session.segment_count(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod voice;

pub use catalog::{CatalogStep, EmotionCatalog, FREE_TEXT_THRESHOLD};
pub use error::SessionError;
pub use parser::{parse_reply, ParseResult, Passage, SectionLabels};
pub use prompt::{compose_user_prompt, voice_selection_prompt};
pub use session::{
    compose_topic, length_target, GenerationTicket, PrayerSegment, PrayerSession,
    SessionActions, SessionState, MAX_SEGMENTS,
};
pub use voice::decode_voice_reply;
