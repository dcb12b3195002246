use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Where capture WAVs and the synthesized reply live
    pub cache_dir: PathBuf,

    /// Capture sample rate (voice quality keeps uploads small)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Capture channel count (1 = mono)
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Captures shorter than this count as an empty utterance
    #[serde(default = "default_min_utterance_ms")]
    pub min_utterance_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    #[serde(default = "default_translation_model")]
    pub translation_model: String,

    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    #[serde(default = "default_voice")]
    pub voice: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguagesConfig {
    pub left: String,
    pub right: String,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            left: "en".to_string(),
            right: "ru".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    /// Theme preference file
    pub theme_path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            theme_path: PathBuf::from("theme.json"),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }

    /// Resolve the API key from config or environment.
    pub fn api_key(&self) -> Option<String> {
        self.openai
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_channels() -> u16 {
    1
}

fn default_min_utterance_ms() -> u64 {
    150
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_translation_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}
