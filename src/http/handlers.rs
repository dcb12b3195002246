use super::state::AppState;
use crate::error::InterpreterError;
use crate::pipeline::LanguageTag;
use crate::session::{PressOutcome, SessionStatus, Side};
use crate::theme::ThemeMode;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PressResponse {
    pub side: Side,
    pub outcome: PressOutcome,
    pub status: SessionStatus,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub outcome: PressOutcome,
    pub status: SessionStatus,
}

#[derive(Debug, Deserialize)]
pub struct SetLanguageRequest {
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemePreference {
    pub mode: ThemeMode,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_status(err: &InterpreterError) -> StatusCode {
    match err {
        InterpreterError::SessionBusy => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /interpreter/record/:side
/// Record-control press: start, stop, or switch depending on current state
pub async fn press_record(
    State(state): State<AppState>,
    Path(side): Path<String>,
) -> impl IntoResponse {
    let Ok(side) = side.parse::<Side>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("unknown side: {}", side),
            }),
        )
            .into_response();
    };

    match state.orchestrator.press(side).await {
        Ok(outcome) => {
            let status = state.orchestrator.status().await;
            (
                StatusCode::OK,
                Json(PressResponse {
                    side,
                    outcome,
                    status,
                }),
            )
                .into_response()
        }
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /interpreter/stop
/// Stop the active recording and run the pipeline
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.orchestrator.stop().await {
        Ok(outcome) => {
            let status = state.orchestrator.status().await;
            (StatusCode::OK, Json(StopResponse { outcome, status })).into_response()
        }
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /interpreter/status
/// Current session snapshot (state, languages, control availability)
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.orchestrator.status().await;
    (StatusCode::OK, Json(status))
}

/// PUT /interpreter/language/:side
/// Change one side's language; rejected while a session is active
pub async fn set_language(
    State(state): State<AppState>,
    Path(side): Path<String>,
    Json(req): Json<SetLanguageRequest>,
) -> impl IntoResponse {
    let Ok(side) = side.parse::<Side>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("unknown side: {}", side),
            }),
        )
            .into_response();
    };

    let language = LanguageTag::new(&req.language);
    if language.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "empty language code".to_string(),
            }),
        )
            .into_response();
    }

    match state.orchestrator.set_language(side, language).await {
        Ok(()) => {
            let status = state.orchestrator.status().await;
            (StatusCode::OK, Json(status)).into_response()
        }
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /preferences/theme
/// Read the persisted theme mode
pub async fn get_theme(State(state): State<AppState>) -> impl IntoResponse {
    let mode = state.theme.load();
    (StatusCode::OK, Json(ThemePreference { mode }))
}

/// PUT /preferences/theme
/// Persist a new theme mode
pub async fn set_theme(
    State(state): State<AppState>,
    Json(req): Json<ThemePreference>,
) -> impl IntoResponse {
    match state.theme.save(req.mode) {
        Ok(()) => {
            info!(mode = ?req.mode, "Theme preference saved");
            (StatusCode::OK, Json(ThemePreference { mode: req.mode })).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to save theme: {}", e),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
