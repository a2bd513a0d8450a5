//! Multi-segment prayer session state machine.
//!
//! A session covers one emotional topic and holds up to [`MAX_SEGMENTS`]
//! generated prayers. Every generation is bracketed by a
//! [`GenerationTicket`]: `start_topic`/`continue_topic` hand one out, and the
//! result handlers only accept a ticket that still matches the pending
//! segment of the current topic. Results for abandoned topics are rejected
//! without touching the session.
//!
//! ```text
//! Idle ──start_topic──▶ Generating(1) ──succeeded──▶ Ready ──continue_topic──▶ Generating(n+1)
//!   ▲                        │ failed                  │                            │
//!   └────────────────────────┘                         ▼ (n == MAX_SEGMENTS)        ▼
//!                                                   Complete                    Ready / Complete
//! ```

use crate::error::SessionError;
use crate::parser::Passage;
use std::collections::VecDeque;
use vigil_types::{Voice, VoiceChoice};

/// Maximum number of segments per topic.
pub const MAX_SEGMENTS: usize = 4;

/// Separator between a topic and its free-text elaboration.
pub const DETAIL_SEPARATOR: &str = " - ";

/// Requested length for a segment, in words/characters.
///
/// Advisory input to the prompt; replies are not checked against it.
pub fn length_target(segment_number: usize) -> u32 {
    match segment_number {
        0 | 1 => 120,
        2 => 200,
        _ => 250,
    }
}

/// Joins a topic with an optional elaboration typed by the user.
pub fn compose_topic(topic: &str, detail: Option<&str>) -> String {
    match detail.map(str::trim).filter(|d| !d.is_empty()) {
        Some(detail) => format!("{}{}{}", topic.trim(), DETAIL_SEPARATOR, detail),
        None => topic.trim().to_string(),
    }
}

/// One generated prayer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerSegment {
    pub text: String,
    pub voice: Voice,
    /// Delivery guidance for speech synthesis; empty if unavailable.
    pub instructions: String,
    /// 1-based position in generation order.
    pub sequence_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No topic selected.
    Idle,
    /// Waiting for the given segment.
    Generating { segment: usize },
    /// Segments shown; more can be requested.
    Ready,
    /// Segment limit reached.
    Complete,
}

/// Proof that a generation was started for a particular segment of a
/// particular topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
    segment_number: usize,
}

impl GenerationTicket {
    pub fn segment_number(&self) -> usize {
        self.segment_number
    }

    pub fn length_target(&self) -> u32 {
        length_target(self.segment_number)
    }
}

/// UI actions currently allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionActions {
    pub can_continue: bool,
    pub can_go_back: bool,
    pub can_reset: bool,
}

/// State for the current emotional topic.
#[derive(Debug, Clone)]
pub struct PrayerSession {
    emotion: Option<String>,
    /// Newest first.
    segments: VecDeque<PrayerSegment>,
    passage: Option<Passage>,
    diagnostic: Option<String>,
    state: SessionState,
    epoch: u64,
}

impl Default for PrayerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PrayerSession {
    pub fn new() -> Self {
        Self {
            emotion: None,
            segments: VecDeque::with_capacity(MAX_SEGMENTS),
            passage: None,
            diagnostic: None,
            state: SessionState::Idle,
            epoch: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn emotion(&self) -> Option<&str> {
        self.emotion.as_deref()
    }

    pub fn max_segments(&self) -> usize {
        MAX_SEGMENTS
    }

    /// Segments, most recent first.
    pub fn segments(&self) -> impl Iterator<Item = &PrayerSegment> {
        self.segments.iter()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Looks a segment up by its sequence number.
    pub fn segment(&self, sequence_number: usize) -> Option<&PrayerSegment> {
        self.segments
            .iter()
            .find(|seg| seg.sequence_number == sequence_number)
    }

    /// Scripture and explanation of the most recent successful generation.
    pub fn passage(&self) -> Option<&Passage> {
        self.passage.as_ref()
    }

    /// Message from the last failed generation, if it has not been superseded.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, SessionState::Generating { .. })
    }

    pub fn actions(&self) -> SessionActions {
        let settled = matches!(self.state, SessionState::Ready | SessionState::Complete);
        SessionActions {
            can_continue: self.state == SessionState::Ready
                && self.segments.len() < MAX_SEGMENTS,
            can_go_back: settled,
            can_reset: self.state != SessionState::Idle,
        }
    }

    /// Starts a new topic, discarding any previous segments.
    pub fn start_topic(&mut self, emotion: impl Into<String>) -> Result<GenerationTicket, SessionError> {
        let emotion = emotion.into();
        if emotion.trim().is_empty() {
            return Err(SessionError::EmptyTopic);
        }
        if let SessionState::Generating { segment } = self.state {
            return Err(SessionError::GenerationInFlight(segment));
        }

        self.epoch += 1;
        self.segments.clear();
        self.passage = None;
        self.diagnostic = None;
        self.emotion = Some(emotion);
        Ok(self.begin(1))
    }

    /// Requests the next segment for the current topic.
    pub fn continue_topic(&mut self) -> Result<GenerationTicket, SessionError> {
        match self.state {
            SessionState::Idle => Err(SessionError::NoTopic),
            SessionState::Generating { segment } => Err(SessionError::GenerationInFlight(segment)),
            SessionState::Complete => Err(SessionError::SegmentLimitReached(MAX_SEGMENTS)),
            SessionState::Ready if self.segments.len() >= MAX_SEGMENTS => {
                Err(SessionError::SegmentLimitReached(MAX_SEGMENTS))
            }
            SessionState::Ready => Ok(self.begin(self.segments.len() + 1)),
        }
    }

    fn begin(&mut self, segment_number: usize) -> GenerationTicket {
        self.state = SessionState::Generating {
            segment: segment_number,
        };
        tracing::debug!(epoch = self.epoch, segment = segment_number, "generation started");
        GenerationTicket {
            epoch: self.epoch,
            segment_number,
        }
    }

    fn check_ticket(&self, ticket: &GenerationTicket) -> Result<(), SessionError> {
        let pending = matches!(
            self.state,
            SessionState::Generating { segment } if segment == ticket.segment_number
        );
        if ticket.epoch != self.epoch || !pending {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                segment = ticket.segment_number,
                "ignoring stale generation result"
            );
            return Err(SessionError::StaleTicket(ticket.segment_number));
        }
        Ok(())
    }

    /// Records a successful generation and returns the new segment.
    pub fn on_generation_succeeded(
        &mut self,
        ticket: &GenerationTicket,
        passage: Passage,
        voice: VoiceChoice,
    ) -> Result<&PrayerSegment, SessionError> {
        self.check_ticket(ticket)?;

        let segment = PrayerSegment {
            text: passage.prayer.clone(),
            voice: voice.voice,
            instructions: voice.instructions,
            sequence_number: self.segments.len() + 1,
        };
        self.segments.push_front(segment);
        self.passage = Some(passage);
        self.diagnostic = None;
        self.state = if self.segments.len() >= MAX_SEGMENTS {
            SessionState::Complete
        } else {
            SessionState::Ready
        };

        tracing::debug!(
            segment = ticket.segment_number,
            state = ?self.state,
            "generation succeeded"
        );
        Ok(&self.segments[0])
    }

    /// Records a failed generation. Existing segments are left untouched.
    pub fn on_generation_failed(
        &mut self,
        ticket: &GenerationTicket,
        diagnostic: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;

        let diagnostic = diagnostic.into();
        tracing::debug!(segment = ticket.segment_number, %diagnostic, "generation failed");
        self.diagnostic = Some(diagnostic);
        if self.segments.is_empty() {
            self.state = SessionState::Idle;
            self.emotion = None;
        } else {
            self.state = SessionState::Ready;
        }
        Ok(())
    }

    /// Drops the topic and all segments. Pending results become stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.segments.clear();
        self.emotion = None;
        self.passage = None;
        self.diagnostic = None;
        self.state = SessionState::Idle;
    }
}
