// Shared test fixtures: scripted pipeline stages and an orchestrator rig
// wired entirely from mocks. Not every test binary uses every helper.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tolk::audio::{
    AudioSessionController, MockCaptureBackend, PermissionGate, Recorder, RecorderConfig,
    StaticGate,
};
use tolk::pipeline::{
    LanguageTag, SynthesizedAsset, Synthesizer, Transcriber, TranslationPipeline, Translator,
};
use tolk::playback::{MockStereoPlayer, PlaybackRouter};
use tolk::session::SessionOrchestrator;
use tolk::{InterpreterError, Result};

/// Records the order of remote stage invocations across all mocks
#[derive(Clone, Default)]
pub struct StageLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl StageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

/// What a scripted stage should do when invoked
#[derive(Clone)]
pub enum Script {
    Succeed(String),
    Fail(String),
}

pub struct MockTranscriber {
    pub log: StageLog,
    pub script: Script,
    pub delay: Option<Duration>,
}

impl MockTranscriber {
    pub fn returning(log: StageLog, text: &str) -> Self {
        Self {
            log,
            script: Script::Succeed(text.to_string()),
            delay: None,
        }
    }

    pub fn failing(log: StageLog, message: &str) -> Self {
        Self {
            log,
            script: Script::Fail(message.to_string()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &Path, language: &LanguageTag) -> Result<String> {
        self.log.record(format!("transcribe:{}", language));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.script {
            Script::Succeed(text) => Ok(text.clone()),
            Script::Fail(message) => Err(InterpreterError::transcription(message.clone())),
        }
    }
}

pub struct MockTranslator {
    pub log: StageLog,
    pub script: Script,
}

impl MockTranslator {
    pub fn returning(log: StageLog, text: &str) -> Self {
        Self {
            log,
            script: Script::Succeed(text.to_string()),
        }
    }

    pub fn failing(log: StageLog, message: &str) -> Self {
        Self {
            log,
            script: Script::Fail(message.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        _text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<String> {
        self.log.record(format!("translate:{}->{}", source, target));
        match &self.script {
            Script::Succeed(text) => Ok(text.clone()),
            Script::Fail(message) => Err(InterpreterError::translation(message.clone())),
        }
    }
}

pub struct MockSynthesizer {
    pub log: StageLog,
    pub output_dir: PathBuf,
    pub fail_message: Option<String>,
}

impl MockSynthesizer {
    pub fn writing_to(log: StageLog, output_dir: PathBuf) -> Self {
        Self {
            log,
            output_dir,
            fail_message: None,
        }
    }

    pub fn failing(log: StageLog, output_dir: PathBuf, message: &str) -> Self {
        Self {
            log,
            output_dir,
            fail_message: Some(message.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str, voice: &str) -> Result<SynthesizedAsset> {
        self.log.record(format!("synthesize:{}", voice));
        if let Some(message) = &self.fail_message {
            return Err(InterpreterError::synthesis(message.clone()));
        }
        let path = self.output_dir.join("translated.mp3");
        std::fs::write(&path, b"mp3").expect("write mock synthesis output");
        Ok(SynthesizedAsset { path })
    }
}

/// Everything an orchestrator test needs to observe
pub struct Rig {
    pub orchestrator: SessionOrchestrator,
    pub audio_session: Arc<AudioSessionController>,
    pub player: MockStereoPlayer,
    pub log: StageLog,
    // Holds the cache dir alive for the test's duration
    pub temp: TempDir,
}

pub struct RigBuilder {
    backend: MockCaptureBackend,
    transcriber: Option<MockTranscriber>,
    translator: Option<MockTranslator>,
    synthesizer: Option<MockSynthesizer>,
    player: Option<MockStereoPlayer>,
    permission_granted: bool,
    log: StageLog,
    temp: TempDir,
}

impl RigBuilder {
    pub fn new() -> Self {
        Self {
            backend: MockCaptureBackend::new().with_utterance_ms(500),
            transcriber: None,
            translator: None,
            synthesizer: None,
            player: None,
            permission_granted: true,
            log: StageLog::new(),
            temp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn log(&self) -> StageLog {
        self.log.clone()
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }

    pub fn backend(mut self, backend: MockCaptureBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn transcriber(mut self, transcriber: MockTranscriber) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn translator(mut self, translator: MockTranslator) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn synthesizer(mut self, synthesizer: MockSynthesizer) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn player(mut self, player: MockStereoPlayer) -> Self {
        self.player = Some(player);
        self
    }

    pub fn permission_denied(mut self) -> Self {
        self.permission_granted = false;
        self
    }

    /// Build a left=en / right=ru orchestrator over the configured mocks.
    pub fn build(self) -> Rig {
        let audio_session = Arc::new(AudioSessionController::new());
        let cache_dir = self.temp.path().to_path_buf();

        let gate: Arc<dyn PermissionGate> = Arc::new(StaticGate::new(self.permission_granted));

        let recorder = Recorder::new(
            Box::new(self.backend),
            gate,
            Arc::clone(&audio_session),
            RecorderConfig {
                cache_dir: cache_dir.clone(),
                sample_rate: 16000,
                channels: 1,
                min_utterance_ms: 150,
            },
        )
        .expect("create recorder");

        let log = self.log;
        let transcriber = self
            .transcriber
            .unwrap_or_else(|| MockTranscriber::returning(log.clone(), "hello"));
        let translator = self
            .translator
            .unwrap_or_else(|| MockTranslator::returning(log.clone(), "привет"));
        let synthesizer = self
            .synthesizer
            .unwrap_or_else(|| MockSynthesizer::writing_to(log.clone(), cache_dir.clone()));

        let pipeline = Arc::new(TranslationPipeline::new(
            Arc::new(transcriber),
            Arc::new(translator),
            Arc::new(synthesizer),
            "alloy".to_string(),
        ));

        let player = self
            .player
            .unwrap_or_else(MockStereoPlayer::new)
            .with_session_probe(Arc::clone(&audio_session));

        let router = Arc::new(PlaybackRouter::new(
            Arc::new(player.clone()),
            Arc::clone(&audio_session),
        ));

        let orchestrator = SessionOrchestrator::new(
            recorder,
            pipeline,
            router,
            LanguageTag::new("en"),
            LanguageTag::new("ru"),
        );

        Rig {
            orchestrator,
            audio_session,
            player,
            log,
            temp: self.temp,
        }
    }
}

impl Default for RigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
