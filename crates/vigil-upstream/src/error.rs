use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The credential named here is not configured.
    #[error("{0} not set in environment")]
    MissingCredentials(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("no audioContent in speech response")]
    MissingAudio,
}

impl UpstreamError {
    /// True for errors caused by the caller's input rather than the upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
