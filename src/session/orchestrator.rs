use super::state::{SessionState, SessionStatus, Side, SideControls};
use crate::audio::Recorder;
use crate::error::{InterpreterError, Result};
use crate::pipeline::{LanguageTag, TranslationJob, TranslationPipeline};
use crate::playback::PlaybackRouter;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// What a record-control press did
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PressOutcome {
    /// Recording started on the pressed side
    Started,
    /// The active recording was handed to the pipeline
    Stopped,
    /// The pressed side took over; the previous capture was discarded
    Switched,
    /// The capture was empty; the session went straight back to idle
    Empty,
}

struct Inner {
    state: SessionState,
    left_language: LanguageTag,
    right_language: LanguageTag,
    recording_started_at: Option<DateTime<Utc>>,
    last_error: Option<String>,

    // Pipeline + playback run here so the control surface stays responsive;
    // tests await it through wait_for_completion.
    session_task: Option<JoinHandle<()>>,
}

/// The finite-state controller for one interpreter device.
///
/// Owns side selection, the loading indicator, and the error-recovery
/// policy; sequences Recorder, TranslationPipeline, and PlaybackRouter.
/// Exactly one session is in flight at any time.
#[derive(Clone)]
pub struct SessionOrchestrator {
    inner: Arc<Mutex<Inner>>,
    recorder: Arc<Mutex<Recorder>>,
    pipeline: Arc<TranslationPipeline>,
    router: Arc<PlaybackRouter>,
}

impl SessionOrchestrator {
    pub fn new(
        recorder: Recorder,
        pipeline: Arc<TranslationPipeline>,
        router: Arc<PlaybackRouter>,
        left_language: LanguageTag,
        right_language: LanguageTag,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::Idle,
                left_language,
                right_language,
                recording_started_at: None,
                last_error: None,
                session_task: None,
            })),
            recorder: Arc::new(Mutex::new(recorder)),
            pipeline,
            router,
        }
    }

    /// Snapshot for the control API.
    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().await;
        let state = inner.state;

        SessionStatus {
            state: state.name().to_string(),
            active_side: state.active_side(),
            loading: state.is_loading(),
            left_language: inner.left_language.clone(),
            right_language: inner.right_language.clone(),
            record_enabled: SideControls {
                left: state.record_enabled(Side::Left),
                right: state.record_enabled(Side::Right),
            },
            pickers_enabled: state == SessionState::Idle,
            recording_started_at: inner.recording_started_at,
            last_error: inner.last_error.clone(),
        }
    }

    /// Change one side's language. Only allowed while idle; the pickers are
    /// disabled for the whole recording/processing/playing stretch.
    pub async fn set_language(&self, side: Side, language: LanguageTag) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionState::Idle {
            return Err(InterpreterError::SessionBusy);
        }

        info!(side = %side, language = %language, "Language changed");
        match side {
            Side::Left => inner.left_language = language,
            Side::Right => inner.right_language = language,
        }

        Ok(())
    }

    /// Handle a record-control press on the given side.
    ///
    /// Idle → start recording. Press on the recording side → stop and hand
    /// the capture to the pipeline. Press on the other side while recording →
    /// discard the capture and restart on the pressed side. Press while
    /// processing or playing → rejected.
    pub async fn press(&self, side: Side) -> Result<PressOutcome> {
        let state = { self.inner.lock().await.state };

        match state {
            SessionState::Idle => {
                self.start_recording(side).await?;
                Ok(PressOutcome::Started)
            }
            SessionState::Recording(active) if active == side => self.stop().await,
            SessionState::Recording(active) => {
                info!(from = %active, to = %side, "Switching active speaker; discarding capture");
                self.start_recording(side).await?;
                Ok(PressOutcome::Switched)
            }
            SessionState::Processing(_) | SessionState::Playing(_) => {
                warn!(side = %side, "Press rejected: session busy");
                Err(InterpreterError::SessionBusy)
            }
        }
    }

    /// Stop the active recording and hand the utterance to the pipeline.
    ///
    /// An empty capture skips the pipeline entirely and returns to idle; the
    /// loading indicator never shows.
    pub async fn stop(&self) -> Result<PressOutcome> {
        let side = {
            let inner = self.inner.lock().await;
            match inner.state {
                SessionState::Recording(side) => side,
                SessionState::Idle => return Ok(PressOutcome::Empty),
                _ => return Err(InterpreterError::SessionBusy),
            }
        };

        let ended = { self.recorder.lock().await.end().await };

        let utterance = match ended {
            Ok(Some(utterance)) => utterance,
            Ok(None) => {
                info!(side = %side, "Empty utterance; returning to idle");
                self.reset_to_idle(None).await;
                return Ok(PressOutcome::Empty);
            }
            Err(e) => {
                self.fail_session(&e).await;
                return Err(e);
            }
        };

        let (source, target) = {
            let mut inner = self.inner.lock().await;
            inner.state = SessionState::Processing(side);
            inner.recording_started_at = None;
            (
                inner.language_for(side),
                inner.language_for(side.opposite()),
            )
        };

        let job = TranslationJob {
            audio: utterance,
            source,
            target,
        };

        let task = {
            let orchestrator = self.clone();
            tokio::spawn(async move {
                orchestrator.run_session(side, job).await;
            })
        };

        self.inner.lock().await.session_task = Some(task);

        Ok(PressOutcome::Stopped)
    }

    /// Await the in-flight pipeline/playback task, if any. Used by tests and
    /// graceful shutdown; the HTTP surface polls status instead.
    pub async fn wait_for_completion(&self) {
        let task = { self.inner.lock().await.session_task.take() };
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Session task panicked: {}", e);
            }
        }
    }

    async fn start_recording(&self, side: Side) -> Result<()> {
        // Recorder::begin tears down any previous capture before opening a
        // new one, which is exactly the switch-speaker policy.
        let begun = { self.recorder.lock().await.begin().await };

        if let Err(e) = begun {
            self.fail_session(&e).await;
            return Err(e);
        }

        let mut inner = self.inner.lock().await;
        inner.state = SessionState::Recording(side);
        inner.recording_started_at = Some(Utc::now());
        inner.last_error = None;

        info!(side = %side, "Recording");

        Ok(())
    }

    /// Pipeline + playback for one utterance. Runs on a spawned task; every
    /// exit path ends in Idle.
    async fn run_session(&self, speaker: Side, job: TranslationJob) {
        let job_id = Uuid::new_v4();
        let listener = speaker.opposite();

        info!(
            %job_id,
            speaker = %speaker,
            source = %job.source,
            target = %job.target,
            duration_ms = job.audio.duration_ms,
            "Processing utterance"
        );

        let output = match self.pipeline.run(job).await {
            Ok(output) => output,
            Err(e) => {
                self.fail_session(&e).await;
                return;
            }
        };

        info!(
            %job_id,
            transcript = %output.transcript,
            translation = %output.translation,
            "Pipeline complete; playing toward {}",
            listener
        );

        self.inner.lock().await.state = SessionState::Playing(listener);

        // route() restores record-ready mode on success and failure alike.
        match self.router.route(&output.asset, listener).await {
            Ok(()) => {
                info!(%job_id, "Playback complete");
                self.reset_to_idle(None).await;
            }
            Err(e) => {
                self.fail_session(&e).await;
            }
        }
    }

    /// Error policy: surface the message, clear session resources, idle.
    async fn fail_session(&self, err: &InterpreterError) {
        error!("Session failed: {}", err);
        self.reset_to_idle(Some(err.to_string())).await;
    }

    async fn reset_to_idle(&self, last_error: Option<String>) {
        let mut inner = self.inner.lock().await;
        inner.state = SessionState::Idle;
        inner.recording_started_at = None;
        inner.last_error = last_error;
    }
}

impl Inner {
    fn language_for(&self, side: Side) -> LanguageTag {
        match side {
            Side::Left => self.left_language.clone(),
            Side::Right => self.right_language.clone(),
        }
    }
}
