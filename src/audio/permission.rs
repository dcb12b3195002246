//! Microphone permission gate.
//!
//! Capture may only begin once the platform has granted microphone access;
//! the gate is queried (and may prompt) before every first capture.

use crate::error::{InterpreterError, Result};

#[async_trait::async_trait]
pub trait PermissionGate: Send + Sync {
    /// Query or request microphone permission.
    async fn request_microphone(&self) -> bool;
}

/// Ask the gate, mapping refusal to the typed error.
pub async fn ensure_microphone(gate: &dyn PermissionGate) -> Result<()> {
    if gate.request_microphone().await {
        Ok(())
    } else {
        Err(InterpreterError::PermissionDenied)
    }
}

/// Gate for platforms where access is implicit (headless/server builds).
pub struct AlwaysGranted;

#[async_trait::async_trait]
impl PermissionGate for AlwaysGranted {
    async fn request_microphone(&self) -> bool {
        true
    }
}

/// Scripted gate for testing denial paths.
pub struct StaticGate {
    granted: bool,
}

impl StaticGate {
    pub fn new(granted: bool) -> Self {
        Self { granted }
    }
}

#[async_trait::async_trait]
impl PermissionGate for StaticGate {
    async fn request_microphone(&self) -> bool {
        self.granted
    }
}
