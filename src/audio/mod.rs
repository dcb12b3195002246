pub mod backend;
pub mod permission;
pub mod recorder;
pub mod session;

#[cfg(feature = "cpal-audio")]
pub mod capture;

pub use backend::{AudioFrame, CaptureBackend, CaptureBackendFactory, CaptureConfig, MockCaptureBackend};
pub use permission::{AlwaysGranted, PermissionGate, StaticGate};
pub use recorder::{RecordedUtterance, Recorder, RecorderConfig};
pub use session::{AudioSessionController, AudioSessionMode, PlaybackModeGuard};
