// Unit tests for business rules

use super::*;
use std::path::PathBuf;

fn movie() -> SelectedMedia {
    SelectedMedia {
        name: "movie.mov".to_string(),
        size: 4,
        mime_type: "video/quicktime".to_string(),
        path: PathBuf::from("movie.mov"),
    }
}

fn response(status: u16, disposition: Option<&str>, body: &[u8]) -> TrimResponse {
    TrimResponse {
        status,
        content_disposition: disposition.map(str::to_string),
        content_type: None,
        body: body.to_vec(),
    }
}

#[test]
fn test_validate_rejects_reversed_range() {
    let err = RangeValidator::validate(5.0, 3.0).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(err.to_string(), "Start time must be less than end time");
}

#[test]
fn test_validate_rejects_empty_range() {
    assert!(matches!(
        RangeValidator::validate(4.0, 4.0),
        Err(DomainError::Validation(_))
    ));
}

#[test]
fn test_validate_rejects_negative_start() {
    let err = RangeValidator::validate(-1.0, 10.0).unwrap_err();
    assert_eq!(err.to_string(), "Start time must be non-negative");
}

#[test]
fn test_validate_rejects_nan() {
    assert!(RangeValidator::validate(f64::NAN, 10.0).is_err());
}

#[test]
fn test_validate_accepts_ordered_range() {
    assert!(RangeValidator::validate(0.0, 0.001).is_ok());
    assert!(RangeValidator::validate(1.5, 30.0).is_ok());
}

#[test]
fn test_decimal_string() {
    assert_eq!(decimal_string(5.0), "5");
    assert_eq!(decimal_string(1.5), "1.5");
    assert_eq!(decimal_string(0.1), "0.1");
    assert_eq!(decimal_string(12.345), "12.345");
}

#[test]
fn test_filename_quoted() {
    assert_eq!(
        filename_from_content_disposition("attachment; filename=\"clip.mp4\""),
        Some("clip.mp4".to_string())
    );
    assert_eq!(
        filename_from_content_disposition("attachment; filename='clip.mp4'; size=10"),
        Some("clip.mp4".to_string())
    );
}

#[test]
fn test_filename_unquoted_stops_at_semicolon() {
    assert_eq!(
        filename_from_content_disposition("attachment; filename=trimmed_a.mp4; size=3"),
        Some("trimmed_a.mp4".to_string())
    );
}

#[test]
fn test_filename_extended_parameter_keeps_charset_prefix() {
    // matches the first filename* parameter verbatim, quotes stripped
    assert_eq!(
        filename_from_content_disposition("attachment; filename*=utf-8''clip.mp4"),
        Some("utf-8clip.mp4".to_string())
    );
}

#[test]
fn test_filename_absent() {
    assert_eq!(filename_from_content_disposition("inline"), None);
}

#[test]
fn test_backend_error_detail() {
    assert_eq!(
        backend_error_message(br#"{"detail": "invalid time range"}"#),
        "invalid time range"
    );
}

#[test]
fn test_backend_error_generic_fallbacks() {
    assert_eq!(backend_error_message(b"<html>oops</html>"), GENERIC_BACKEND_MESSAGE);
    assert_eq!(backend_error_message(br#"{"error": "x"}"#), GENERIC_BACKEND_MESSAGE);
    assert_eq!(
        backend_error_message(br#"{"detail": [{"msg": "field required"}]}"#),
        GENERIC_BACKEND_MESSAGE
    );
    assert_eq!(backend_error_message(&[0xff, 0xfe, 0x00]), GENERIC_BACKEND_MESSAGE);
}

#[test]
fn test_interpret_success_with_header() {
    let result = interpret_response(
        &movie(),
        response(200, Some("attachment; filename=\"clip.mp4\""), b"DATA"),
    )
    .unwrap();
    assert_eq!(result.filename, "clip.mp4");
    assert_eq!(result.content_type, DEFAULT_RESULT_CONTENT_TYPE);
    assert_eq!(result.bytes, b"DATA");
}

#[test]
fn test_interpret_success_without_header() {
    let result = interpret_response(&movie(), response(200, None, b"DATA")).unwrap();
    assert_eq!(result.filename, "trimmed_movie.mov");
}

#[test]
fn test_interpret_failure_carries_detail() {
    let err = interpret_response(
        &movie(),
        response(400, None, br#"{"detail": "invalid time range"}"#),
    )
    .unwrap_err();
    assert_eq!(
        err,
        DomainError::Backend {
            status: 400,
            message: "invalid time range".to_string()
        }
    );
    assert_eq!(err.to_string(), "invalid time range");
}

#[test]
fn test_sanitize_download_name() {
    assert_eq!(sanitize_download_name("clip.mp4", "fb.mp4"), "clip.mp4");
    assert_eq!(sanitize_download_name("../../etc/passwd", "fb.mp4"), "passwd");
    assert_eq!(sanitize_download_name("C:\\tmp\\x.mp4", "fb.mp4"), "x.mp4");
    assert_eq!(sanitize_download_name("dir/", "fb.mp4"), "fb.mp4");
    assert_eq!(sanitize_download_name("..", "fb.mp4"), "fb.mp4");
    assert_eq!(sanitize_download_name("  ", "fb.mp4"), "fb.mp4");
}

#[test]
fn test_numbered_name() {
    assert_eq!(numbered_name("clip.mp4", 1), "clip (1).mp4");
    assert_eq!(numbered_name("archive.tar.gz", 2), "archive.tar (2).gz");
    assert_eq!(numbered_name("README", 3), "README (3)");
    assert_eq!(numbered_name(".hidden", 1), ".hidden (1)");
}
