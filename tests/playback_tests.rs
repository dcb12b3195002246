// Integration tests for playback routing and the audio-session discipline
//
// The router must hold playback mode only while the player runs and must
// restore record-ready mode on every exit path; the completion signal must
// accept exactly one resolution.

use std::sync::Arc;
use tolk::audio::{AudioSessionController, AudioSessionMode};
use tolk::pipeline::SynthesizedAsset;
use tolk::playback::{CompletionSignal, MockStereoPlayer, Pan, PlaybackRouter};
use tolk::session::Side;
use tolk::InterpreterError;

fn asset() -> SynthesizedAsset {
    SynthesizedAsset {
        path: std::path::PathBuf::from("/tmp/tolk-test/translated.mp3"),
    }
}

#[tokio::test]
async fn test_left_side_maps_to_hard_left_pan() {
    let controller = Arc::new(AudioSessionController::new());
    let player = MockStereoPlayer::new();
    let router = PlaybackRouter::new(Arc::new(player.clone()), Arc::clone(&controller));

    router.route(&asset(), Side::Left).await.unwrap();

    let invocations = player.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].1, Pan::HardLeft);
}

#[tokio::test]
async fn test_right_side_maps_to_hard_right_pan() {
    let controller = Arc::new(AudioSessionController::new());
    let player = MockStereoPlayer::new();
    let router = PlaybackRouter::new(Arc::new(player.clone()), Arc::clone(&controller));

    router.route(&asset(), Side::Right).await.unwrap();

    assert_eq!(player.invocations()[0].1, Pan::HardRight);
}

#[test]
fn test_pan_positions_are_hard() {
    assert_eq!(Pan::HardLeft.position(), -1.0);
    assert_eq!(Pan::HardRight.position(), 1.0);
    assert_eq!(Pan::HardLeft.channel_gains(), [1.0, 0.0]);
    assert_eq!(Pan::HardRight.channel_gains(), [0.0, 1.0]);
}

#[tokio::test]
async fn test_playback_mode_held_during_play_released_after() {
    let controller = Arc::new(AudioSessionController::new());
    let player = MockStereoPlayer::new().with_session_probe(Arc::clone(&controller));
    let router = PlaybackRouter::new(Arc::new(player.clone()), Arc::clone(&controller));

    assert_eq!(controller.mode(), AudioSessionMode::RecordReady);

    router.route(&asset(), Side::Right).await.unwrap();

    // Playback mode while the player ran, record-ready afterwards
    assert_eq!(player.observed_modes(), vec![AudioSessionMode::Playback]);
    assert_eq!(controller.mode(), AudioSessionMode::RecordReady);
}

#[tokio::test]
async fn test_player_failure_propagates_but_mode_is_released() {
    let controller = Arc::new(AudioSessionController::new());
    let player = MockStereoPlayer::new().with_failure("cannot decode");
    let router = PlaybackRouter::new(Arc::new(player.clone()), Arc::clone(&controller));

    let err = router.route(&asset(), Side::Left).await.unwrap_err();
    match err {
        InterpreterError::Playback { message } => assert_eq!(message, "cannot decode"),
        other => panic!("expected Playback error, got {:?}", other),
    }

    assert_eq!(controller.mode(), AudioSessionMode::RecordReady);
}

#[tokio::test]
async fn test_completion_signal_takes_first_resolution_only() {
    let (signal, listener) = CompletionSignal::new();

    // Success lands first, a late error callback must be dropped
    assert!(signal.resolve(Ok(())));
    assert!(!signal.resolve(Err(InterpreterError::playback("late error"))));

    listener.wait().await.unwrap();
}

#[tokio::test]
async fn test_completion_signal_first_error_wins() {
    let (signal, listener) = CompletionSignal::new();

    assert!(signal.resolve(Err(InterpreterError::playback("decode error"))));
    assert!(!signal.resolve(Ok(())));

    let err = listener.wait().await.unwrap_err();
    assert!(err.to_string().contains("decode error"));
}

#[tokio::test]
async fn test_completion_signal_dropped_without_resolution_is_an_error() {
    let (signal, listener) = CompletionSignal::new();
    drop(signal);

    let err = listener.wait().await.unwrap_err();
    assert!(matches!(err, InterpreterError::Playback { .. }));
}
