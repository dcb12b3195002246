//! Native stereo player abstraction.
//!
//! The player contract is narrow: play one local file panned hard to one
//! channel, resolve exactly once with success or failure. Callback-style
//! backends signal through [`CompletionSignal`], which only accepts the
//! first resolution.

use crate::audio::{AudioSessionController, AudioSessionMode};
use crate::error::{InterpreterError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Binary stereo panning: the synthesized reply goes to one ear only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pan {
    HardLeft,
    HardRight,
}

impl Pan {
    /// Pan position on the usual -1.0 (left) .. 1.0 (right) scale.
    pub fn position(self) -> f32 {
        match self {
            Pan::HardLeft => -1.0,
            Pan::HardRight => 1.0,
        }
    }

    /// Per-channel gains `[left, right]` for channel-volume backends.
    pub fn channel_gains(self) -> [f32; 2] {
        match self {
            Pan::HardLeft => [1.0, 0.0],
            Pan::HardRight => [0.0, 1.0],
        }
    }
}

/// Native stereo player: one invocation, one resolution.
#[async_trait::async_trait]
pub trait StereoPlayer: Send + Sync {
    async fn play(&self, path: &Path, pan: Pan) -> Result<()>;
}

/// Single-shot completion channel for callback-style players.
///
/// A native player may fire both a finished callback and a later error
/// callback; only the first signal wins, the rest are dropped.
#[derive(Clone)]
pub struct CompletionSignal {
    tx: Arc<Mutex<Option<oneshot::Sender<Result<()>>>>>,
}

pub struct CompletionListener {
    rx: oneshot::Receiver<Result<()>>,
}

impl CompletionSignal {
    pub fn new() -> (Self, CompletionListener) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            CompletionListener { rx },
        )
    }

    /// Deliver the outcome. Returns false if a signal already landed.
    pub fn resolve(&self, outcome: Result<()>) -> bool {
        match self.tx.lock().unwrap().take() {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

impl CompletionListener {
    /// Wait for the first (and only) resolution.
    pub async fn wait(self) -> Result<()> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(InterpreterError::playback(
                "player dropped without resolving",
            )),
        }
    }
}

/// Mock player for testing: records invocations, scripts outcomes, and can
/// probe the audio-session mode observed while playing.
#[derive(Clone)]
pub struct MockStereoPlayer {
    invocations: Arc<Mutex<Vec<(PathBuf, Pan)>>>,
    fail_message: Option<String>,
    session_probe: Option<Arc<AudioSessionController>>,
    observed_modes: Arc<Mutex<Vec<AudioSessionMode>>>,
}

impl MockStereoPlayer {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            fail_message: None,
            session_probe: None,
            observed_modes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script every play() call to fail with the given message
    pub fn with_failure(mut self, message: &str) -> Self {
        self.fail_message = Some(message.to_string());
        self
    }

    /// Record the audio-session mode seen while each play() runs
    pub fn with_session_probe(mut self, controller: Arc<AudioSessionController>) -> Self {
        self.session_probe = Some(controller);
        self
    }

    pub fn invocations(&self) -> Vec<(PathBuf, Pan)> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn observed_modes(&self) -> Vec<AudioSessionMode> {
        self.observed_modes.lock().unwrap().clone()
    }
}

impl Default for MockStereoPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StereoPlayer for MockStereoPlayer {
    async fn play(&self, path: &Path, pan: Pan) -> Result<()> {
        self.invocations
            .lock()
            .unwrap()
            .push((path.to_path_buf(), pan));

        if let Some(controller) = &self.session_probe {
            self.observed_modes.lock().unwrap().push(controller.mode());
        }

        match &self.fail_message {
            Some(message) => Err(InterpreterError::playback(message.clone())),
            None => Ok(()),
        }
    }
}
