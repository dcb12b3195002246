//! Single-utterance microphone recording.
//!
//! One capture at a time: begin() opens the backend and accumulates PCM
//! frames, end() finalizes them into a WAV asset for the transcription
//! stage, discard() throws the capture away (side switch mid-recording).

use crate::audio::backend::{AudioFrame, CaptureBackend};
use crate::audio::permission::{ensure_microphone, PermissionGate};
use crate::audio::session::AudioSessionController;
use crate::error::{InterpreterError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Recorder configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Directory for the capture WAV
    pub cache_dir: PathBuf,
    /// Capture sample rate
    pub sample_rate: u32,
    /// Capture channel count
    pub channels: u16,
    /// Captures shorter than this count as empty
    pub min_utterance_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("tolk"),
            sample_rate: 16000,
            channels: 1,
            min_utterance_ms: 150,
        }
    }
}

/// A finished capture, ready for transcription
#[derive(Debug, Clone)]
pub struct RecordedUtterance {
    /// Path to the WAV asset
    pub path: PathBuf,
    /// Capture length in milliseconds
    pub duration_ms: u64,
    /// Number of PCM samples captured
    pub sample_count: usize,
}

/// An in-progress capture: accumulated samples plus the drain task feeding
/// them. At most one exists at a time.
struct CaptureHandle {
    samples: Arc<Mutex<Vec<i16>>>,
    drain_task: JoinHandle<()>,
}

impl CaptureHandle {
    fn start(mut frames: mpsc::Receiver<AudioFrame>) -> Self {
        let samples = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&samples);

        let drain_task = tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                sink.lock().unwrap().extend_from_slice(&frame.samples);
            }
        });

        Self {
            samples,
            drain_task,
        }
    }

    /// Wait for the backend to close the frame channel, then take the samples.
    async fn finish(self) -> Vec<i16> {
        if let Err(e) = self.drain_task.await {
            warn!("Capture drain task panicked: {}", e);
        }
        std::mem::take(&mut *self.samples.lock().unwrap())
    }

    fn abandon(self) {
        self.drain_task.abort();
    }
}

pub struct Recorder {
    backend: Box<dyn CaptureBackend>,
    gate: Arc<dyn PermissionGate>,
    audio_session: Arc<AudioSessionController>,
    config: RecorderConfig,
    capture: Option<CaptureHandle>,
}

impl Recorder {
    pub fn new(
        backend: Box<dyn CaptureBackend>,
        gate: Arc<dyn PermissionGate>,
        audio_session: Arc<AudioSessionController>,
        config: RecorderConfig,
    ) -> Result<Self> {
        fs::create_dir_all(&config.cache_dir)?;

        Ok(Self {
            backend,
            gate,
            audio_session,
            config,
            capture: None,
        })
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_some()
    }

    /// Start a new capture, tearing down any previous one first.
    pub async fn begin(&mut self) -> Result<()> {
        ensure_microphone(self.gate.as_ref()).await?;

        if self.capture.is_some() {
            self.discard().await;
        }

        self.audio_session.set_record_ready();

        let frames = self.backend.start().await?;
        self.capture = Some(CaptureHandle::start(frames));

        info!(backend = self.backend.name(), "Capture started");

        Ok(())
    }

    /// Stop the capture and finalize it into a WAV asset.
    ///
    /// Returns `None` for an empty utterance (shorter than the configured
    /// minimum); the handle is destroyed either way.
    pub async fn end(&mut self) -> Result<Option<RecordedUtterance>> {
        let Some(handle) = self.capture.take() else {
            return Ok(None);
        };

        if let Err(e) = self.backend.stop().await {
            handle.abandon();
            return Err(e);
        }

        let samples = handle.finish().await;

        let duration_ms = samples.len() as u64 * 1000
            / (self.config.sample_rate as u64 * self.config.channels as u64);

        if duration_ms < self.config.min_utterance_ms {
            info!(duration_ms, "Discarding empty utterance");
            return Ok(None);
        }

        let path = self.config.cache_dir.join("utterance.wav");
        write_wav(&path, &samples, self.config.sample_rate, self.config.channels)?;

        info!(
            duration_ms,
            samples = samples.len(),
            path = %path.display(),
            "Capture finalized"
        );

        Ok(Some(RecordedUtterance {
            path,
            duration_ms,
            sample_count: samples.len(),
        }))
    }

    /// Throw away the in-flight capture without transcribing it.
    pub async fn discard(&mut self) {
        if let Some(handle) = self.capture.take() {
            if let Err(e) = self.backend.stop().await {
                warn!("Failed to stop backend while discarding capture: {}", e);
            }
            handle.abandon();
            info!("Capture discarded");
        }
    }
}

/// Write 16-bit PCM samples as a WAV file, overwriting any previous capture.
fn write_wav(path: &Path, samples: &[i16], sample_rate: u32, channels: u16) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| {
        InterpreterError::StopFailed {
            message: format!("failed to create {}: {}", path.display(), e),
        }
    })?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| InterpreterError::StopFailed {
                message: format!("failed to write sample: {}", e),
            })?;
    }

    writer.finalize().map_err(|e| InterpreterError::StopFailed {
        message: format!("failed to finalize {}: {}", path.display(), e),
    })?;

    Ok(())
}
