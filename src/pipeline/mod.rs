//! The three-stage remote pipeline: transcribe → translate → synthesize.
//!
//! Stages are strictly sequential because each stage's output is the next
//! stage's sole input. Any failure aborts the remaining stages; nothing is
//! cached or retried here; re-recording is the recovery path.

use crate::audio::RecordedUtterance;
use crate::error::{InterpreterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Opaque language code ("en", "ru", "de", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Normalize a code: trimmed, lowercased. The tag is otherwise opaque;
    /// the remote services decide what they accept.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A synthesized reply on disk (fixed cache path, overwritten per utterance).
#[derive(Debug, Clone)]
pub struct SynthesizedAsset {
    pub path: PathBuf,
}

/// One utterance handed to the pipeline: the recorded audio plus the
/// direction to translate in. Consumed by [`TranslationPipeline::run`].
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub audio: RecordedUtterance,
    pub source: LanguageTag,
    pub target: LanguageTag,
}

/// Everything the pipeline produced for one utterance.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub transcript: String,
    pub translation: String,
    pub asset: SynthesizedAsset,
}

/// Speech-to-text stage.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path, language: &LanguageTag) -> Result<String>;
}

/// Text translation stage.
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<String>;
}

/// Text-to-speech stage.
#[async_trait::async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<SynthesizedAsset>;
}

/// Sequences the three remote stages for one job.
pub struct TranslationPipeline {
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    voice: String,
}

impl TranslationPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
        voice: String,
    ) -> Self {
        Self {
            transcriber,
            translator,
            synthesizer,
            voice,
        }
    }

    /// Run transcribe → translate → synthesize, in that order, aborting on
    /// the first failure.
    pub async fn run(&self, job: TranslationJob) -> Result<PipelineOutput> {
        let transcript = self
            .transcriber
            .transcribe(&job.audio.path, &job.source)
            .await?;

        if transcript.trim().is_empty() {
            return Err(InterpreterError::transcription(
                "service returned no usable text",
            ));
        }

        info!(
            source = %job.source,
            chars = transcript.len(),
            "Transcription complete"
        );

        let translation = self
            .translator
            .translate(&transcript, &job.source, &job.target)
            .await?;

        info!(
            source = %job.source,
            target = %job.target,
            chars = translation.len(),
            "Translation complete"
        );

        let asset = self.synthesizer.synthesize(&translation, &self.voice).await?;

        info!(path = %asset.path.display(), "Synthesis complete");

        Ok(PipelineOutput {
            transcript,
            translation,
            asset,
        })
    }
}
