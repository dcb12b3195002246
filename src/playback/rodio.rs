//! rodio-backed stereo player (feature `playback`).
//!
//! Decodes the synthesized MP3 and plays it with one channel silenced.
//! The output stream lives on a blocking thread for the duration of the
//! clip; the async side waits on the single-shot completion signal.

use crate::error::{InterpreterError, Result};
use crate::playback::player::{CompletionSignal, Pan, StereoPlayer};
use rodio::source::{ChannelVolume, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StereoPlayer for RodioPlayer {
    async fn play(&self, path: &Path, pan: Pan) -> Result<()> {
        let (signal, listener) = CompletionSignal::new();
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let outcome = play_blocking(&path, pan);
            signal.resolve(outcome);
        });

        listener.wait().await
    }
}

fn play_blocking(path: &Path, pan: Pan) -> Result<()> {
    let file = File::open(path)
        .map_err(|e| InterpreterError::playback(format!("open {}: {}", path.display(), e)))?;

    let decoder = rodio::Decoder::new(BufReader::new(file))
        .map_err(|e| InterpreterError::playback(format!("decode: {}", e)))?;

    let gains = pan.channel_gains();
    let source = ChannelVolume::new(decoder.convert_samples::<f32>(), gains.to_vec());

    let (_stream, handle) = rodio::OutputStream::try_default()
        .map_err(|e| InterpreterError::playback(format!("open output: {}", e)))?;

    let sink = rodio::Sink::try_new(&handle)
        .map_err(|e| InterpreterError::playback(format!("create sink: {}", e)))?;

    debug!(path = %path.display(), ?pan, "Playing synthesized reply");

    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}
