use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tolk::audio::{
    AlwaysGranted, AudioSessionController, CaptureBackendFactory, CaptureConfig, Recorder,
    RecorderConfig,
};
use tolk::pipeline::{LanguageTag, TranslationPipeline};
use tolk::playback::{PlaybackRouter, StereoPlayerFactory};
use tolk::session::SessionOrchestrator;
use tolk::theme::ThemeStore;
use tolk::{create_router, AppState, Config, OpenAiClient};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "tolk", about = "Two-way conversational voice interpreter")]
struct Args {
    /// Config file (without extension, e.g. config/tolk)
    #[arg(long, default_value = "config/tolk")]
    config: String,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);

    let api_key = cfg
        .api_key()
        .context("No OpenAI API key (set openai.api_key or OPENAI_API_KEY)")?;

    // Single audio-session mode shared by recorder and playback
    let audio_session = Arc::new(AudioSessionController::new());

    let backend = CaptureBackendFactory::create(CaptureConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        buffer_duration_ms: 100,
    })?;

    let recorder = Recorder::new(
        backend,
        Arc::new(AlwaysGranted),
        Arc::clone(&audio_session),
        RecorderConfig {
            cache_dir: cfg.audio.cache_dir.clone(),
            sample_rate: cfg.audio.sample_rate,
            channels: cfg.audio.channels,
            min_utterance_ms: cfg.audio.min_utterance_ms,
        },
    )?;

    let client = Arc::new(OpenAiClient::new(
        &cfg.openai,
        api_key,
        cfg.audio.cache_dir.clone(),
    ));

    let pipeline = Arc::new(TranslationPipeline::new(
        client.clone(),
        client.clone(),
        client.clone(),
        cfg.openai.voice.clone(),
    ));

    let player = StereoPlayerFactory::create()?;
    let router = Arc::new(PlaybackRouter::new(player, Arc::clone(&audio_session)));

    let orchestrator = SessionOrchestrator::new(
        recorder,
        pipeline,
        router,
        LanguageTag::new(&cfg.languages.left),
        LanguageTag::new(&cfg.languages.right),
    );

    let theme = Arc::new(ThemeStore::new(cfg.preferences.theme_path.clone()));

    let state = AppState::new(orchestrator, theme);
    let app = create_router(state);

    let bind = args.bind.unwrap_or(cfg.service.http.bind);
    let port = args.port.unwrap_or(cfg.service.http.port);

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind, port))?;

    info!("HTTP API listening on {}:{}", bind, port);

    axum::serve(listener, app).await?;

    Ok(())
}
