//! Error types for prayer session transitions.

/// Reasons a session operation was rejected.
///
/// A rejected operation never changes the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The topic label was empty or whitespace.
    #[error("topic label is empty")]
    EmptyTopic,

    /// A generation is already pending for this session.
    #[error("generation already in flight for segment {0}")]
    GenerationInFlight(usize),

    /// No topic has been started.
    #[error("no topic selected")]
    NoTopic,

    /// The session already holds the maximum number of segments.
    #[error("segment limit reached ({0})")]
    SegmentLimitReached(usize),

    /// The result belongs to an abandoned topic or an earlier segment.
    #[error("stale generation result for segment {0}")]
    StaleTicket(usize),
}
