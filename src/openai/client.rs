//! OpenAI-backed implementations of the three pipeline stages.
//!
//! One HTTP client covers all stages: `audio/transcriptions` (speech-to-text),
//! `chat/completions` (translation), `audio/speech` (synthesis). Every call is
//! a single request/response round trip; failures carry the service's error
//! message.

use crate::config::OpenAiConfig;
use crate::error::{InterpreterError, Result};
use crate::openai::messages::{
    extract_error_message, ChatMessage, ChatRequest, ChatResponse, SpeechRequest,
    TranscriptionResponse,
};
use crate::pipeline::{LanguageTag, SynthesizedAsset, Synthesizer, Transcriber, Translator};
use reqwest::multipart;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename of the synthesized reply inside the cache directory. Only one
/// reply exists at a time; each synthesis overwrites the last.
const SYNTHESIS_FILENAME: &str = "translated.mp3";

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    transcription_model: String,
    translation_model: String,
    speech_model: String,
    cache_dir: PathBuf,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig, api_key: String, cache_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.clone(),
            transcription_model: config.transcription_model.clone(),
            translation_model: config.translation_model.clone(),
            speech_model: config.speech_model.clone(),
            cache_dir,
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(&self, audio: &Path, language: &LanguageTag) -> Result<String> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|e| InterpreterError::transcription(format!("read capture: {}", e)))?;

        let file_part = multipart::Part::bytes(bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| InterpreterError::transcription(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.transcription_model.clone())
            .text("language", language.as_str().to_string())
            .text("response_format", "json")
            .part("file", file_part);

        debug!(model = %self.transcription_model, language = %language, "Uploading capture for transcription");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| InterpreterError::transcription(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InterpreterError::transcription(extract_error_message(&body)));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| InterpreterError::transcription(format!("body: {}", e)))?;

        Ok(parsed.text.trim().to_string())
    }
}

#[async_trait::async_trait]
impl Translator for OpenAiClient {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.translation_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: format!("Translate {} to {} and return result:", source, target),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
        };

        debug!(model = %self.translation_model, source = %source, target = %target, "Requesting translation");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InterpreterError::translation(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InterpreterError::translation(extract_error_message(&body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| InterpreterError::translation(format!("body: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(InterpreterError::translation(error.message));
        }

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| InterpreterError::translation("empty choices"))
    }
}

#[async_trait::async_trait]
impl Synthesizer for OpenAiClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<SynthesizedAsset> {
        let url = format!("{}/audio/speech", self.base_url);

        let request = SpeechRequest {
            model: self.speech_model.clone(),
            input: text.to_string(),
            voice: voice.to_string(),
            response_format: "mp3".to_string(),
        };

        debug!(model = %self.speech_model, voice, "Requesting speech synthesis");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InterpreterError::synthesis(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InterpreterError::synthesis(extract_error_message(&body)));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| InterpreterError::synthesis(format!("payload: {}", e)))?;

        let path = self.cache_dir.join(SYNTHESIS_FILENAME);
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| InterpreterError::synthesis(format!("persist {}: {}", path.display(), e)))?;

        Ok(SynthesizedAsset { path })
    }
}
