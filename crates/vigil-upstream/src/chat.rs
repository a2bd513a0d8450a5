//! Chat-completion client for the hosted language models.

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use vigil_types::ChatMessage;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1200;

/// Hosted chat-completion providers, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatProvider {
    Groq,
    OpenAi,
}

impl ChatProvider {
    pub fn model(self) -> &'static str {
        match self {
            Self::Groq => "llama3-70b-8192",
            Self::OpenAi => "gpt-3.5-turbo",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Groq => "你是一位溫柔誠懇的基督徒禱告助手。",
            Self::OpenAi => "You are a gentle and sincere Christian prayer assistant.",
        }
    }

    /// Name of the environment variable holding this provider's key.
    pub fn credential_name(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groq => f.write_str("groq"),
            Self::OpenAi => f.write_str("openai"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Sends prompts to Groq or OpenAI with server-held credentials.
#[derive(Debug, Clone)]
pub struct ChatGateway {
    config: UpstreamConfig,
    client: reqwest::Client,
}

impl ChatGateway {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = config.http_client();
        Self { config, client }
    }

    fn credential(&self, provider: ChatProvider) -> &str {
        match provider {
            ChatProvider::Groq => &self.config.groq_api_key,
            ChatProvider::OpenAi => &self.config.openai_api_key,
        }
    }

    fn endpoint(&self, provider: ChatProvider) -> String {
        let base = match provider {
            ChatProvider::Groq => &self.config.groq_base_url,
            ChatProvider::OpenAi => &self.config.openai_base_url,
        };
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    pub fn is_configured(&self, provider: ChatProvider) -> bool {
        !self.credential(provider).is_empty()
    }

    /// Groq if its key is set, otherwise OpenAI if its key is set.
    pub fn preferred_provider(&self) -> Option<ChatProvider> {
        [ChatProvider::Groq, ChatProvider::OpenAi]
            .into_iter()
            .find(|p| self.is_configured(*p))
    }

    /// Sends one system + user exchange and returns the provider's JSON
    /// envelope unmodified.
    pub async fn complete(
        &self,
        provider: ChatProvider,
        user_prompt: &str,
    ) -> Result<Value, UpstreamError> {
        let key = self.credential(provider);
        if key.is_empty() {
            return Err(UpstreamError::MissingCredentials(provider.credential_name()));
        }

        let body = ChatCompletionRequest {
            model: provider.model(),
            messages: vec![
                ChatMessage::system(provider.system_prompt()),
                ChatMessage::user(user_prompt),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!(%provider, model = body.model, "sending chat completion");

        let response = self
            .client
            .post(self.endpoint(provider))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%provider, status = status.as_u16(), "chat completion failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }
}
