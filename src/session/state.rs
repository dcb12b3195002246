use crate::pipeline::LanguageTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two conversation participants. The active speaker's opposite
/// side is the playback target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

/// The orchestrator's mode. One tagged value instead of scattered flags, so
/// impossible combinations ("processing while recording") cannot be
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing in flight; both record controls and pickers live
    Idle,
    /// Capturing the given side's speech
    Recording(Side),
    /// Transcribe → translate → synthesize in flight for the given speaker
    Processing(Side),
    /// Playing the synthesized reply toward the given side
    Playing(Side),
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Recording(_) => "recording",
            SessionState::Processing(_) => "processing",
            SessionState::Playing(_) => "playing",
        }
    }

    pub fn active_side(self) -> Option<Side> {
        match self {
            SessionState::Idle => None,
            SessionState::Recording(side)
            | SessionState::Processing(side)
            | SessionState::Playing(side) => Some(side),
        }
    }

    /// Loading indicator: the stretch between stop and the end of playback
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            SessionState::Processing(_) | SessionState::Playing(_)
        )
    }

    /// Whether the given side's record control accepts a press
    pub fn record_enabled(self, side: Side) -> bool {
        match self {
            SessionState::Idle => true,
            SessionState::Recording(active) => active == side,
            SessionState::Processing(_) | SessionState::Playing(_) => false,
        }
    }
}

/// Per-side record-control availability, mirroring the two-button UI
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SideControls {
    pub left: bool,
    pub right: bool,
}

/// Serializable snapshot of the session for the control API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Current mode: "idle", "recording", "processing", "playing"
    pub state: String,

    /// The speaker the current activity belongs to, if any
    pub active_side: Option<Side>,

    /// True from stop until playback finishes
    pub loading: bool,

    /// Language spoken on each side
    pub left_language: LanguageTag,
    pub right_language: LanguageTag,

    /// Which record controls accept a press right now
    pub record_enabled: SideControls,

    /// Language pickers are only live while idle
    pub pickers_enabled: bool,

    /// When the in-progress recording started, if any
    pub recording_started_at: Option<DateTime<Utc>>,

    /// Message of the last session-ending error, cleared on the next start
    pub last_error: Option<String>,
}
