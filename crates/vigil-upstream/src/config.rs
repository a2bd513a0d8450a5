use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_google_tts_base_url() -> String {
    "https://texttospeech.googleapis.com/v1".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

/// Endpoints and credentials for the hosted model and speech APIs.
///
/// Credentials are never read from the config file; they are filled from
/// the environment by the server at start-up.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(skip)]
    pub groq_api_key: String,
    #[serde(skip)]
    pub openai_api_key: String,
    #[serde(skip)]
    pub google_tts_api_key: String,
    #[serde(default = "default_groq_base_url")]
    pub groq_base_url: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_google_tts_base_url")]
    pub google_tts_base_url: String,
    /// Per-request timeout. Default: 60 seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            groq_api_key: String::new(),
            openai_api_key: String::new(),
            google_tts_api_key: String::new(),
            groq_base_url: default_groq_base_url(),
            openai_base_url: default_openai_base_url(),
            google_tts_base_url: default_google_tts_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "[REDACTED]"
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("google_tts_api_key", &redact(&self.google_tts_api_key))
            .field("groq_base_url", &self.groq_base_url)
            .field("openai_base_url", &self.openai_base_url)
            .field("google_tts_base_url", &self.google_tts_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl UpstreamConfig {
    /// Reads `GROQ_API_KEY`, `OPENAI_API_KEY` and `GOOGLE_TTS_API_KEY`.
    /// Blank values count as unset.
    pub fn with_env_credentials(mut self) -> Self {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        self.groq_api_key = read("GROQ_API_KEY");
        self.openai_api_key = read("OPENAI_API_KEY");
        self.google_tts_api_key = read("GOOGLE_TTS_API_KEY");
        self
    }

    /// Points every upstream at one base URL. Used to run against a local
    /// stand-in server.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        self.groq_base_url = base.clone();
        self.openai_base_url = base.clone();
        self.google_tts_base_url = base;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    pub(crate) fn http_client(&self) -> reqwest::Client {
        let built = reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .build();
        match built {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    timeout_seconds = self.timeout_seconds,
                    "upstream http client build failed, requests will not time out"
                );
                reqwest::Client::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_keys() {
        let config = UpstreamConfig {
            groq_api_key: "gsk_secret".to_string(),
            ..UpstreamConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("gsk_secret"));
        assert!(printed.contains("[REDACTED]"));
        assert!(printed.contains("<unset>"));
    }

    #[test]
    fn keys_are_not_serialized() {
        let config = UpstreamConfig {
            openai_api_key: "sk-secret".to_string(),
            ..UpstreamConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn keys_are_not_read_from_files() {
        let config: UpstreamConfig =
            toml::from_str("groq_api_key = \"from-file\"\ntimeout_seconds = 5").unwrap();
        assert!(config.groq_api_key.is_empty());
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn base_url_override_trims_slash() {
        let config = UpstreamConfig::default().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.groq_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.google_tts_base_url, "http://127.0.0.1:9000");
    }
}
