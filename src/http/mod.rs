//! HTTP API server for external control (the device UI)
//!
//! This module provides a REST API for driving the interpreter session:
//! - POST /interpreter/record/:side - Press a side's record control
//! - POST /interpreter/stop - Stop the active recording
//! - GET /interpreter/status - Query session state and control availability
//! - PUT /interpreter/language/:side - Change a side's language (idle only)
//! - GET|PUT /preferences/theme - Theme preference
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, PressResponse, SetLanguageRequest, StopResponse, ThemePreference};
pub use routes::create_router;
pub use state::AppState;
