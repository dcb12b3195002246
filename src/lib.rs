pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod openai;
pub mod pipeline;
pub mod playback;
pub mod session;
pub mod theme;

pub use audio::{
    AudioFrame, AudioSessionController, AudioSessionMode, CaptureBackend, CaptureBackendFactory,
    CaptureConfig, MockCaptureBackend, RecordedUtterance, Recorder, RecorderConfig,
};
pub use config::Config;
pub use error::{InterpreterError, Result};
pub use http::{create_router, AppState};
pub use openai::OpenAiClient;
pub use pipeline::{
    LanguageTag, PipelineOutput, SynthesizedAsset, Synthesizer, Transcriber, TranslationJob,
    TranslationPipeline, Translator,
};
pub use playback::{MockStereoPlayer, Pan, PlaybackRouter, StereoPlayer, StereoPlayerFactory};
pub use session::{PressOutcome, SessionOrchestrator, SessionState, SessionStatus, Side};
pub use theme::{Appearance, ThemeMode, ThemeStore};
