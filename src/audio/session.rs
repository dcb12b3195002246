//! Audio session mode switching.
//!
//! The device audio subsystem is either record-ready or playing back the
//! synthesized reply, never both. Playback mode is entered through a guard
//! whose drop restores record-ready mode, so every exit path (including
//! errors) releases it.

use std::sync::{Arc, Mutex};
use tracing::warn;

/// Current configuration of the audio subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSessionMode {
    /// Microphone capture is possible
    RecordReady,
    /// The stereo player owns the session
    Playback,
}

/// Owner of the single cross-component audio-session mode.
///
/// Only the orchestrator (via Recorder and PlaybackRouter) mutates this.
pub struct AudioSessionController {
    mode: Mutex<AudioSessionMode>,
}

impl AudioSessionController {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(AudioSessionMode::RecordReady),
        }
    }

    pub fn mode(&self) -> AudioSessionMode {
        *self.mode.lock().unwrap()
    }

    /// Ensure the session permits microphone capture.
    pub fn set_record_ready(&self) {
        *self.mode.lock().unwrap() = AudioSessionMode::RecordReady;
    }

    /// Enter playback mode; record-ready mode is restored when the returned
    /// guard drops, whichever way playback ends.
    pub fn begin_playback(self: &Arc<Self>) -> PlaybackModeGuard {
        {
            let mut mode = self.mode.lock().unwrap();
            if *mode == AudioSessionMode::Playback {
                warn!("Audio session already in playback mode");
            }
            *mode = AudioSessionMode::Playback;
        }
        PlaybackModeGuard {
            controller: Arc::clone(self),
        }
    }
}

impl Default for AudioSessionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases playback mode on drop.
pub struct PlaybackModeGuard {
    controller: Arc<AudioSessionController>,
}

impl Drop for PlaybackModeGuard {
    fn drop(&mut self) {
        self.controller.set_record_ready();
    }
}
