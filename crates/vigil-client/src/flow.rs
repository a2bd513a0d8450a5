//! Drives a [`PrayerSession`] against the proxy.

use crate::counter::UsageCounter;
use crate::error::ClientError;
use crate::proxy::ProxyClient;
use vigil_core::{
    parse_reply, GenerationTicket, ParseResult, PrayerSegment, PrayerSession, SectionLabels,
};
use vigil_types::{GenerationRequest, SpeechRequest};

/// What one generation round produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// A new segment was added to the session.
    Segment(PrayerSegment),
    /// The model answered in no recognised layout. The raw reply is kept
    /// for display and is also the session's diagnostic. `diagnostic` renders
    /// the envelope the reply came in.
    Unparsed {
        raw_text: String,
        diagnostic: Option<String>,
    },
    /// The proxy call failed.
    Failed { diagnostic: String },
}

/// Owns one session and runs its generations one at a time.
pub struct PrayerFlow {
    proxy: ProxyClient,
    session: PrayerSession,
    labels: SectionLabels,
    language: String,
    counter: Option<UsageCounter>,
}

impl PrayerFlow {
    pub fn new(proxy: ProxyClient, labels: SectionLabels, language: impl Into<String>) -> Self {
        Self {
            proxy,
            session: PrayerSession::new(),
            labels,
            language: language.into(),
            counter: None,
        }
    }

    /// Records an audio event on every [`PrayerFlow::speak`].
    pub fn with_counter(mut self, counter: UsageCounter) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn session(&self) -> &PrayerSession {
        &self.session
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Switches the reply language and header labels for later generations.
    pub fn set_language(&mut self, language: impl Into<String>, labels: SectionLabels) {
        self.language = language.into();
        self.labels = labels;
    }

    /// Starts a new topic and generates its first segment.
    pub async fn start(&mut self, emotion: &str) -> Result<FlowOutcome, ClientError> {
        let ticket = self.session.start_topic(emotion)?;
        self.run(ticket).await
    }

    /// Generates the next segment for the current topic.
    pub async fn continue_topic(&mut self) -> Result<FlowOutcome, ClientError> {
        let ticket = self.session.continue_topic()?;
        self.run(ticket).await
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    async fn run(&mut self, ticket: GenerationTicket) -> Result<FlowOutcome, ClientError> {
        let emotion = self.session.emotion().unwrap_or_default().to_string();
        let req = GenerationRequest::for_emotion(&emotion, &self.language, ticket.length_target());

        let reply = match self.proxy.generate(&req).await {
            Ok(reply) => reply,
            Err(e) => {
                let diagnostic = e.to_string();
                tracing::warn!(segment = ticket.segment_number(), error = %e, "generation failed");
                self.session.on_generation_failed(&ticket, diagnostic.clone())?;
                return Ok(FlowOutcome::Failed { diagnostic });
            }
        };

        match parse_reply(&reply.text, &self.labels).with_diagnostic(reply.envelope) {
            ParseResult::Parsed(passage) => {
                let voice = self.proxy.select_voice(&emotion, Some(&passage.prayer)).await;
                let segment = self
                    .session
                    .on_generation_succeeded(&ticket, passage, voice)?
                    .clone();
                Ok(FlowOutcome::Segment(segment))
            }
            ParseResult::Unparsed {
                raw_text,
                diagnostic,
            } => {
                tracing::warn!(
                    segment = ticket.segment_number(),
                    envelope = diagnostic.as_deref().unwrap_or_default(),
                    "reply in unrecognised format"
                );
                self.session.on_generation_failed(&ticket, raw_text.clone())?;
                Ok(FlowOutcome::Unparsed {
                    raw_text,
                    diagnostic,
                })
            }
        }
    }

    /// Synthesizes the segment with the given sequence number in its chosen
    /// voice. Returns `None` if no such segment exists.
    pub async fn speak(&mut self, sequence_number: usize) -> Result<Option<Vec<u8>>, ClientError> {
        let Some(segment) = self.session.segment(sequence_number) else {
            return Ok(None);
        };
        let req = SpeechRequest::new(&segment.text, segment.voice, &segment.instructions);

        let audio = self.proxy.synthesize(&req).await?;
        if let Some(counter) = self.counter.as_mut() {
            counter.record_audio(&self.language).await;
        }
        Ok(Some(audio))
    }
}
