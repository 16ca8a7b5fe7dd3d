use super::*;
use canvas::remap::NormalizedBox;

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_full_response() {
    let json = serde_json::json!({
        "image_gcs_url": "https://storage.example.test/u1/abc.png",
        "ocr_text": "",
        "ai_feedback": "{}",
        "ai_feedback_data": {
            "translated_handwriting": "2x + 3 = 7\nx = 5",
            "errors": [
                { "error_text": "2x = 4, so x = 2", "box_2d": [0, 500, 1000, 1000] }
            ]
        }
    })
    .to_string();
    let report = parse_response(&json).unwrap();
    assert_eq!(report.image_gcs_url.as_deref(), Some("https://storage.example.test/u1/abc.png"));
    assert_eq!(report.translated_handwriting.as_deref(), Some("2x + 3 = 7\nx = 5"));
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].box_2d, NormalizedBox([0.0, 500.0, 1000.0, 1000.0]));
    assert_eq!(report.errors[0].error_text, "2x = 4, so x = 2");
}

#[test]
fn missing_feedback_data_means_no_errors() {
    let report = parse_response(r#"{"image_gcs_url":"u","ocr_text":"","ai_feedback":""}"#).unwrap();
    assert!(report.errors.is_empty());
    assert_eq!(report.translated_handwriting, None);
}

#[test]
fn feedback_data_without_errors_field() {
    let report = parse_response(r#"{"ai_feedback_data":{"translated_handwriting":"x = 1"}}"#).unwrap();
    assert!(report.errors.is_empty());
    assert_eq!(report.translated_handwriting.as_deref(), Some("x = 1"));
}

#[test]
fn legacy_error_masks_are_accepted() {
    let report = parse_response(r#"{"error_masks":[{"box_2d":[1,2,3,4],"label":"carry the one"}]}"#).unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].error_text, "carry the one");
}

#[test]
fn feedback_data_wins_over_error_masks() {
    let json = r#"{"ai_feedback_data":{"errors":[]},"error_masks":[{"box_2d":[1,2,3,4],"label":"old"}]}"#;
    assert!(parse_response(json).unwrap().errors.is_empty());
}

#[test]
fn invalid_json_is_a_service_error() {
    let err = parse_response("<html>").unwrap_err();
    assert!(matches!(err, FeedbackError::Service(msg) if msg.contains("invalid response")));
}

// =============================================================================
// error_message
// =============================================================================

#[test]
fn detail_is_the_message() {
    assert_eq!(error_message(401, r#"{"detail":"Invalid authentication credentials"}"#), "Invalid authentication credentials");
}

#[test]
fn json_without_detail_reports_status() {
    assert_eq!(error_message(500, r#"{"error":"boom"}"#), "Server responded with status 500");
    assert_eq!(error_message(502, r#"{"detail":null}"#), "Server responded with status 502");
    assert_eq!(error_message(503, r#"{"detail":""}"#), "Server responded with status 503");
}

#[test]
fn non_json_body_is_generic() {
    assert_eq!(error_message(502, "Bad Gateway"), UNKNOWN_ERROR_MESSAGE);
    assert_eq!(error_message(500, ""), UNKNOWN_ERROR_MESSAGE);
}

#[test]
fn structured_detail_is_serialized() {
    let msg = error_message(422, r#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#);
    assert!(msg.contains("field required"));
}

// =============================================================================
// construction
// =============================================================================

#[test]
fn client_uses_configured_endpoint() {
    let config = FeedbackConfig { api_base_url: "http://localhost:8000/api/v1".into(), ..FeedbackConfig::default() };
    let client = HttpFeedbackClient::from_config(&config).unwrap();
    assert_eq!(client.url(), "http://localhost:8000/api/v1/submission/submit/solution");
}
