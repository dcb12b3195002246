//! Real microphone capture via cpal.
//!
//! Platform: anywhere cpal has a working input host (ALSA/PipeWire on Linux,
//! CoreAudio on macOS, WASAPI on Windows).

use crate::audio::backend::{AudioFrame, CaptureBackend, CaptureConfig};
use crate::error::{InterpreterError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct CpalBackend {
    config: CaptureConfig,
    device: cpal::Device,
    stream: Arc<Mutex<Option<cpal::Stream>>>,
    buffer: Arc<Mutex<Vec<i16>>>,
    stop_flag: Arc<AtomicBool>,
    drain_task: Option<JoinHandle<()>>,
    capturing: bool,
}

impl CpalBackend {
    pub fn new(config: CaptureConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| InterpreterError::device("no default input device"))?;

        if let Ok(name) = device.name() {
            info!("Using input device: {}", name);
        }

        Ok(Self {
            config,
            device,
            stream: Arc::new(Mutex::new(None)),
            buffer: Arc::new(Mutex::new(Vec::new())),
            stop_flag: Arc::new(AtomicBool::new(false)),
            drain_task: None,
            capturing: false,
        })
    }

    /// Build the input stream, preferring i16 at the target rate and falling
    /// back to f32 with software conversion for float-only devices.
    fn build_stream(&self) -> Result<cpal::Stream> {
        let stream_config = cpal::StreamConfig {
            channels: self.config.channels,
            sample_rate: cpal::SampleRate(self.config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_callback = |err| {
            warn!("Audio input stream error: {}", err);
        };

        let buffer = Arc::clone(&self.buffer);
        if let Ok(stream) = self.device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = buffer.lock() {
                    buf.extend_from_slice(data);
                }
            },
            err_callback,
            None,
        ) {
            return Ok(stream);
        }

        let buffer = Arc::clone(&self.buffer);
        self.device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend(
                            data.iter()
                                .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                        );
                    }
                },
                err_callback,
                None,
            )
            .map_err(|e| InterpreterError::device(format!("failed to open input stream: {}", e)))
    }
}

#[async_trait::async_trait]
impl CaptureBackend for CpalBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing {
            return Err(InterpreterError::device("already capturing"));
        }

        self.buffer.lock().unwrap().clear();
        self.stop_flag.store(false, Ordering::SeqCst);

        let stream = self.build_stream()?;
        stream
            .play()
            .map_err(|e| InterpreterError::device(format!("failed to start capture: {}", e)))?;
        *self.stream.lock().unwrap() = Some(stream);

        let (tx, rx) = mpsc::channel(64);

        // Drain the callback buffer into frames on a fixed cadence
        let buffer = Arc::clone(&self.buffer);
        let stop_flag = Arc::clone(&self.stop_flag);
        let sample_rate = self.config.sample_rate;
        let channels = self.config.channels;
        let interval = Duration::from_millis(self.config.buffer_duration_ms);

        let drain = tokio::spawn(async move {
            let mut timestamp_ms: u64 = 0;

            loop {
                tokio::time::sleep(interval).await;

                let samples: Vec<i16> = {
                    let mut buf = buffer.lock().unwrap();
                    std::mem::take(&mut *buf)
                };

                if !samples.is_empty() {
                    let elapsed_ms =
                        samples.len() as u64 * 1000 / (sample_rate as u64 * channels as u64);
                    let frame = AudioFrame {
                        samples,
                        sample_rate,
                        channels,
                        timestamp_ms,
                    };
                    timestamp_ms += elapsed_ms;

                    if tx.send(frame).await.is_err() {
                        break; // receiver gone
                    }
                }

                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }
            }
        });

        self.drain_task = Some(drain);
        self.capturing = true;

        info!("Microphone capture started");

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }

        // Stop the hardware stream first so the final drain pass sees
        // everything the callback delivered.
        *self.stream.lock().unwrap() = None;
        self.stop_flag.store(true, Ordering::SeqCst);

        if let Some(task) = self.drain_task.take() {
            if let Err(e) = task.await {
                warn!("Capture drain task panicked: {}", e);
            }
        }

        self.capturing = false;

        info!("Microphone capture stopped");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}
