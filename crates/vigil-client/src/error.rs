use thiserror::Error;
use vigil_core::SessionError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The proxy answered with a non-success status. `message` is the
    /// `{error, detail}` envelope rendered as text, or the raw body.
    #[error("proxy returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}
