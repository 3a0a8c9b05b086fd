//! Error taxonomy tests: message content and conversions.

use std::path::PathBuf;

use deslide::{DeslideError, OutputTemplate, SampleRate};

// ── message content ────────────────────────────────────────────────

#[test]
fn file_open_error_names_the_path() {
    let error = DeslideError::FileOpen {
        path: PathBuf::from("/missing/talk.mp4"),
        reason: "No such file or directory".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("/missing/talk.mp4"));
    assert!(message.contains("No such file or directory"));
}

#[test]
fn invalid_sample_rate_echoes_the_input() {
    let error = SampleRate::parse("fast").unwrap_err();
    let message = error.to_string();
    assert!(message.contains("fast"));
}

#[test]
fn invalid_threshold_names_the_value_and_range() {
    let error = DeslideError::InvalidThreshold(1.5);
    let message = error.to_string();
    assert!(message.contains("1.5"));
    assert!(message.contains("(0, 1]"));
}

#[test]
fn invalid_template_names_the_offending_tag() {
    let error = OutputTemplate::parse("slide_%q.png").unwrap_err();
    let message = error.to_string();
    assert!(message.contains("%q"), "got: {message}");
}

#[test]
fn dimension_mismatch_reports_both_extents() {
    let error = DeslideError::DimensionMismatch {
        expected_width: 1920,
        expected_height: 1080,
        actual_width: 1280,
        actual_height: 720,
    };
    let message = error.to_string();
    assert!(message.contains("1920x1080"));
    assert!(message.contains("1280x720"));
}

// ── conversions ────────────────────────────────────────────────────

#[test]
fn io_errors_convert_into_deslide_errors() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: DeslideError = io_error.into();
    assert!(matches!(error, DeslideError::IoError(_)));
}

#[test]
fn errors_implement_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<DeslideError>();
}
