//! Error types for the interpreter session.
//!
//! Every variant is terminal for the session that raised it: the orchestrator
//! surfaces the message, returns to idle, and waits for the next recording.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpreterError {
    // Capture errors
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Audio device unavailable: {message}")]
    DeviceUnavailable { message: String },

    #[error("Failed to finalize capture: {message}")]
    StopFailed { message: String },

    // Remote pipeline errors, one per stage
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Translation failed: {message}")]
    Translation { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // Playback errors
    #[error("Playback failed: {message}")]
    Playback { message: String },

    // A start request arrived while a session was already processing/playing
    #[error("Interpreter session is busy")]
    SessionBusy,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InterpreterError>;

impl InterpreterError {
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::Transcription {
            message: message.into(),
        }
    }

    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation {
            message: message.into(),
        }
    }

    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback {
            message: message.into(),
        }
    }

    pub fn device(message: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: message.into(),
        }
    }
}
