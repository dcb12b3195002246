use crate::error::{InterpreterError, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (will resample if needed)
    pub sample_rate: u32,
    /// Target channel count (1 = mono)
    pub channels: u16,
    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // voice quality keeps uploads small
            channels: 1,        // Mono
            buffer_duration_ms: 100,
        }
    }
}

/// Microphone capture backend trait
///
/// Implementations:
/// - cpal: real microphone input (feature `cpal-audio`)
/// - Mock: scripted frames (for testing)
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    /// Create the microphone backend for this build
    pub fn create(config: CaptureConfig) -> Result<Box<dyn CaptureBackend>> {
        #[cfg(feature = "cpal-audio")]
        {
            let backend = super::capture::CpalBackend::new(config)?;
            Ok(Box::new(backend))
        }

        #[cfg(not(feature = "cpal-audio"))]
        {
            let _ = config;
            Err(InterpreterError::device(
                "built without microphone support (enable the cpal-audio feature)",
            ))
        }
    }
}

/// Mock capture backend for testing
///
/// Emits a configured set of frames on start, then closes the channel,
/// simulating an utterance of a known length.
#[derive(Clone)]
pub struct MockCaptureBackend {
    frames: Vec<AudioFrame>,
    capturing: Arc<Mutex<bool>>,
    fail_start: bool,
    fail_stop: bool,
}

impl MockCaptureBackend {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            capturing: Arc::new(Mutex::new(false)),
            fail_start: false,
            fail_stop: false,
        }
    }

    /// Script the frames delivered by the next capture
    pub fn with_frames(mut self, frames: Vec<AudioFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Script an utterance of the given duration at 16kHz mono
    pub fn with_utterance_ms(self, duration_ms: u64) -> Self {
        let samples = (16000 * duration_ms / 1000) as usize;
        self.with_frames(vec![AudioFrame {
            samples: vec![0i16; samples],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: 0,
        }])
    }

    /// Configure the mock to fail on start
    pub fn with_start_failure(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Configure the mock to fail on stop
    pub fn with_stop_failure(mut self) -> Self {
        self.fail_stop = true;
        self
    }
}

impl Default for MockCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MockCaptureBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.fail_start {
            return Err(InterpreterError::device("mock device failed to open"));
        }

        // Capacity covers every scripted frame so start() never blocks on
        // the not-yet-consumed receiver.
        let (tx, rx) = mpsc::channel(self.frames.len().max(1));
        for frame in self.frames.clone() {
            let _ = tx.send(frame).await;
        }
        *self.capturing.lock().unwrap() = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if self.fail_stop {
            return Err(InterpreterError::StopFailed {
                message: "mock device failed to finalize".to_string(),
            });
        }
        *self.capturing.lock().unwrap() = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        *self.capturing.lock().unwrap()
    }

    fn name(&self) -> &str {
        "mock"
    }
}
