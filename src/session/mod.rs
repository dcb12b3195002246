//! Interpreter session orchestration
//!
//! This module provides the `SessionOrchestrator` state machine that manages:
//! - Record-control presses on either side (start / stop / switch)
//! - The sequential transcribe → translate → synthesize pipeline
//! - Playback routing toward the listening side
//! - Error recovery: every failure returns the session to idle

mod orchestrator;
mod state;

pub use orchestrator::{PressOutcome, SessionOrchestrator};
pub use state::{SessionState, SessionStatus, Side, SideControls};
