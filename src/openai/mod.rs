//! OpenAI HTTP client for the remote pipeline stages.

mod client;
mod messages;

pub use client::OpenAiClient;
pub use messages::{extract_error_message, ChatRequest, ChatResponse, SpeechRequest, TranscriptionResponse};
