//! Clients for the hosted APIs behind the Vigil proxy.
//!
//! [`ChatGateway`] sends prompts to Groq (preferred) or OpenAI chat
//! completions; [`SpeechGateway`] turns prayer text into audio through the
//! OpenAI speech API or Google Cloud Text-to-Speech. Both attach the
//! server-held credentials from [`UpstreamConfig`]; nothing in this crate
//! ever logs or returns a key.

pub mod chat;
pub mod config;
pub mod error;
pub mod tts;

pub use chat::{ChatGateway, ChatProvider};
pub use config::UpstreamConfig;
pub use error::UpstreamError;
pub use tts::SpeechGateway;
