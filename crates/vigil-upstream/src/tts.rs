use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use serde::{Deserialize, Serialize};
use vigil_types::{GoogleSpeechRequest, SpeechRequest};

/// Maximum text input size for TTS (64 KiB). Prevents resource exhaustion from
/// oversized synthesis requests.
const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleSynthesizeBody<'a> {
    input: GoogleInput<'a>,
    voice: GoogleVoice<'a>,
    audio_config: GoogleAudioConfig,
}

#[derive(Debug, Serialize)]
struct GoogleInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleVoice<'a> {
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleAudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleSynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

fn check_text(text: &str) -> Result<(), UpstreamError> {
    if text.trim().is_empty() {
        return Err(UpstreamError::InvalidInput("Missing or invalid text.".to_string()));
    }
    if text.len() > MAX_TTS_INPUT_BYTES {
        return Err(UpstreamError::InvalidInput(format!(
            "text exceeds maximum size: {} bytes (limit: {} bytes)",
            text.len(),
            MAX_TTS_INPUT_BYTES
        )));
    }
    Ok(())
}

/// Service for turning prayer text into speech through the hosted APIs.
#[derive(Debug, Clone)]
pub struct SpeechGateway {
    config: UpstreamConfig,
    client: reqwest::Client,
}

impl SpeechGateway {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = config.http_client();
        Self { config, client }
    }

    /// Sends an OpenAI speech request.
    ///
    /// Returns the upstream response once its status is known to be
    /// successful, so the caller can stream the audio body through.
    pub async fn synthesize_openai(
        &self,
        req: &SpeechRequest,
    ) -> Result<reqwest::Response, UpstreamError> {
        if self.config.openai_api_key.is_empty() {
            return Err(UpstreamError::MissingCredentials("OPENAI_API_KEY"));
        }
        check_text(&req.input)?;

        let url = format!(
            "{}/audio/speech",
            self.config.openai_base_url.trim_end_matches('/')
        );
        tracing::debug!(voice = %req.voice, model = %req.model, chars = req.input.chars().count(), "requesting speech");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.openai_api_key)
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "speech synthesis failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Sends a Google Cloud speech request and returns the base64 mp3.
    pub async fn synthesize_google(&self, req: &GoogleSpeechRequest) -> Result<String, UpstreamError> {
        if self.config.google_tts_api_key.is_empty() {
            return Err(UpstreamError::MissingCredentials("GOOGLE_TTS_API_KEY"));
        }
        check_text(&req.text)?;

        let url = format!(
            "{}/text:synthesize",
            self.config.google_tts_base_url.trim_end_matches('/')
        );
        let body = GoogleSynthesizeBody {
            input: GoogleInput { text: &req.text },
            voice: GoogleVoice {
                language_code: &req.language_code,
                name: req.voice_name.as_deref().filter(|n| !n.is_empty()),
            },
            audio_config: GoogleAudioConfig {
                audio_encoding: "MP3",
                speaking_rate: req.speaking_rate,
            },
        };

        tracing::debug!(language = %req.language_code, "requesting google speech");

        // The key travels in a header so it never appears in a URL or in
        // reqwest's error messages.
        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.config.google_tts_api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "google speech synthesis failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GoogleSynthesizeResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        parsed
            .audio_content
            .filter(|audio| !audio.is_empty())
            .ok_or(UpstreamError::MissingAudio)
    }
}
