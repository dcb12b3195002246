// Integration tests for the three-stage remote pipeline
//
// Verifies strict stage ordering, abort-on-first-failure, and the
// empty-transcript guard, using scripted stages.

mod common;

use common::{MockSynthesizer, MockTranscriber, MockTranslator, StageLog};
use std::sync::Arc;
use tempfile::TempDir;
use tolk::audio::RecordedUtterance;
use tolk::pipeline::{LanguageTag, TranslationJob, TranslationPipeline};
use tolk::InterpreterError;

fn job_for(temp: &TempDir) -> TranslationJob {
    let path = temp.path().join("utterance.wav");
    std::fs::write(&path, b"wav").unwrap();

    TranslationJob {
        audio: RecordedUtterance {
            path,
            duration_ms: 800,
            sample_count: 12800,
        },
        source: LanguageTag::new("en"),
        target: LanguageTag::new("de"),
    }
}

fn pipeline_with(
    transcriber: MockTranscriber,
    translator: MockTranslator,
    synthesizer: MockSynthesizer,
) -> TranslationPipeline {
    TranslationPipeline::new(
        Arc::new(transcriber),
        Arc::new(translator),
        Arc::new(synthesizer),
        "alloy".to_string(),
    )
}

#[tokio::test]
async fn test_stages_run_in_order_and_chain_outputs() {
    let temp = TempDir::new().unwrap();
    let log = StageLog::new();

    let pipeline = pipeline_with(
        MockTranscriber::returning(log.clone(), "good morning"),
        MockTranslator::returning(log.clone(), "guten Morgen"),
        MockSynthesizer::writing_to(log.clone(), temp.path().to_path_buf()),
    );

    let output = pipeline.run(job_for(&temp)).await.unwrap();

    assert_eq!(
        log.calls(),
        vec![
            "transcribe:en".to_string(),
            "translate:en->de".to_string(),
            "synthesize:alloy".to_string(),
        ]
    );
    assert_eq!(output.transcript, "good morning");
    assert_eq!(output.translation, "guten Morgen");
    assert!(output.asset.path.exists());
}

#[tokio::test]
async fn test_transcription_failure_aborts_remaining_stages() {
    let temp = TempDir::new().unwrap();
    let log = StageLog::new();

    let pipeline = pipeline_with(
        MockTranscriber::failing(log.clone(), "bad audio"),
        MockTranslator::returning(log.clone(), "unused"),
        MockSynthesizer::writing_to(log.clone(), temp.path().to_path_buf()),
    );

    let err = pipeline.run(job_for(&temp)).await.unwrap_err();
    assert!(matches!(err, InterpreterError::Transcription { .. }));
    assert_eq!(log.calls(), vec!["transcribe:en".to_string()]);
}

#[tokio::test]
async fn test_empty_transcript_is_a_transcription_error() {
    let temp = TempDir::new().unwrap();
    let log = StageLog::new();

    let pipeline = pipeline_with(
        MockTranscriber::returning(log.clone(), "   "),
        MockTranslator::returning(log.clone(), "unused"),
        MockSynthesizer::writing_to(log.clone(), temp.path().to_path_buf()),
    );

    let err = pipeline.run(job_for(&temp)).await.unwrap_err();
    match err {
        InterpreterError::Transcription { message } => {
            assert!(message.contains("no usable text"));
        }
        other => panic!("expected Transcription error, got {:?}", other),
    }

    // Translation never ran on the blank transcript
    assert_eq!(log.calls(), vec!["transcribe:en".to_string()]);
}

#[tokio::test]
async fn test_translation_failure_aborts_synthesis() {
    let temp = TempDir::new().unwrap();
    let log = StageLog::new();

    let pipeline = pipeline_with(
        MockTranscriber::returning(log.clone(), "hello"),
        MockTranslator::failing(log.clone(), "model overloaded"),
        MockSynthesizer::writing_to(log.clone(), temp.path().to_path_buf()),
    );

    let err = pipeline.run(job_for(&temp)).await.unwrap_err();
    assert!(matches!(err, InterpreterError::Translation { .. }));
    assert_eq!(
        log.calls(),
        vec!["transcribe:en".to_string(), "translate:en->de".to_string()]
    );
}

#[tokio::test]
async fn test_synthesis_failure_propagates() {
    let temp = TempDir::new().unwrap();
    let log = StageLog::new();

    let pipeline = pipeline_with(
        MockTranscriber::returning(log.clone(), "hello"),
        MockTranslator::returning(log.clone(), "hallo"),
        MockSynthesizer::failing(log.clone(), temp.path().to_path_buf(), "tts down"),
    );

    let err = pipeline.run(job_for(&temp)).await.unwrap_err();
    match err {
        InterpreterError::Synthesis { message } => assert_eq!(message, "tts down"),
        other => panic!("expected Synthesis error, got {:?}", other),
    }
    assert_eq!(log.calls().len(), 3);
}

#[test]
fn test_language_tag_normalizes() {
    assert_eq!(LanguageTag::new(" EN ").as_str(), "en");
    assert_eq!(LanguageTag::new("ru").as_str(), "ru");
    assert_eq!(LanguageTag::new("ZH-tw").as_str(), "zh-tw");
    assert!(LanguageTag::new("  ").is_empty());
}
