//! HTTP client for the Vigil proxy endpoints.

use crate::error::ClientError;
use base64::Engine;
use serde_json::Value;
use std::time::Duration;
use vigil_core::{decode_voice_reply, voice_selection_prompt};
use vigil_types::{
    ChatCompletion, EmotionListReply, EnvInfo, ErrorEnvelope, GenerationRequest,
    GoogleSpeechRequest, GoogleSpeechResponse, SpeechRequest, VoiceChoice, VoiceSelectionRequest,
};

/// Groq-only generation route. The page uses it for prayers and voices.
pub const GROQ_PATH: &str = "/api/groq";
/// Generation route that falls back to OpenAI when Groq is not configured.
/// Emotion lists are always requested here.
pub const PRAYER_PATH: &str = "/api/prayer";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The model's reply text together with the envelope it arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    /// `error: detail` when the envelope carries an error, otherwise the
    /// whole envelope as JSON. Shown next to replies that cannot be parsed.
    pub envelope: String,
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    generation_path: String,
    http: reqwest::Client,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let http = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    ?timeout,
                    "http client build failed, requests will not time out"
                );
                reqwest::Client::default()
            }
        };
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            generation_path: GROQ_PATH.to_string(),
            http,
        }
    }

    /// Sends prayer generation to another route, e.g. [`PRAYER_PATH`].
    pub fn with_generation_path(mut self, path: &str) -> Self {
        self.generation_path = path.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_chat(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<GeneratedReply, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let text = success_text(response).await?;

        let completion: ChatCompletion = serde_json::from_str(&text)
            .map_err(|e| ClientError::MalformedResponse(format!("{e}: {text}")))?;
        match completion.first_content() {
            Some(content) => Ok(GeneratedReply {
                text: content.trim().to_string(),
                envelope: describe_error(&text),
            }),
            None => Err(ClientError::MalformedResponse(describe_error(&text))),
        }
    }

    /// Requests one prayer and returns the model's reply.
    pub async fn generate(&self, req: &GenerationRequest) -> Result<GeneratedReply, ClientError> {
        self.post_chat(&self.generation_path, req).await
    }

    /// Asks the model to pick a voice for `emotion`, and delivery
    /// instructions when `prayer_text` is given.
    ///
    /// Never fails: any error yields the default voice with no instructions.
    pub async fn select_voice(&self, emotion: &str, prayer_text: Option<&str>) -> VoiceChoice {
        let body = VoiceSelectionRequest {
            content: voice_selection_prompt(emotion, prayer_text),
            prayer_text: prayer_text.map(str::to_string),
        };

        match self.post_chat(GROQ_PATH, &body).await {
            Ok(reply) => decode_voice_reply(&reply.text, prayer_text.is_some()),
            Err(e) => {
                tracing::warn!(error = %e, "voice selection failed, using default voice");
                VoiceChoice::default()
            }
        }
    }

    /// Asks `POST /api/prayer` for a list of emotions suited to `context`.
    ///
    /// Never fails: any error yields a copy of `fallback`.
    pub async fn fetch_emotions(&self, context: &str, fallback: &[String]) -> Vec<String> {
        match self.request_emotions(context).await {
            Ok(labels) => labels,
            Err(e) => {
                tracing::warn!(error = %e, "emotion list unavailable, using fallback");
                fallback.to_vec()
            }
        }
    }

    async fn request_emotions(&self, context: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .post(self.url(PRAYER_PATH))
            .json(&GenerationRequest::for_topic(context))
            .send()
            .await?;
        let text = success_text(response).await?;

        let reply: EmotionListReply = serde_json::from_str(&text)
            .map_err(|e| ClientError::MalformedResponse(format!("{e}: {text}")))?;
        Ok(reply.result.into_labels())
    }

    /// Synthesizes speech through `POST /api/audio` and returns the mp3 bytes.
    pub async fn synthesize(&self, req: &SpeechRequest) -> Result<Vec<u8>, ClientError> {
        let response = self.http.post(self.url("/api/audio")).json(req).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: describe_error(&text),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Synthesizes speech through `POST /api/google-tts` and returns the
    /// decoded mp3 bytes.
    pub async fn google_speech(&self, req: &GoogleSpeechRequest) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .post(self.url("/api/google-tts"))
            .json(req)
            .send()
            .await?;
        let text = success_text(response).await?;

        let parsed: GoogleSpeechResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(parsed.audio_content.as_bytes())
            .map_err(|e| ClientError::MalformedResponse(format!("audioContent: {e}")))
    }

    /// Reads `GET /api/env`.
    pub async fn environment(&self) -> Result<EnvInfo, ClientError> {
        let response = self.http.get(self.url("/api/env")).send().await?;
        let text = success_text(response).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

/// Reads the body, turning a non-2xx status into [`ClientError::Status`].
async fn success_text(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: describe_error(&text),
        });
    }
    Ok(text)
}

/// Renders an error body as `error: detail`, falling back to the raw text.
fn describe_error(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.to_string();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
