use super::*;

#[test]
fn test_classify_rate_limit_keeps_retry_after() {
    match HttpErrorMapper::classify(429, Some(30), "") {
        AgentError::RateLimit { retry_after } => assert_eq!(retry_after, Some(30)),
        other => panic!("expected RateLimit, got {:?}", other),
    }
}

#[test]
fn test_classify_auth_statuses() {
    let body = r#"{"error": {"type": "invalid_api_key", "message": "Incorrect API key"}}"#;
    for status in [401, 403] {
        match HttpErrorMapper::classify(status, None, body) {
            AgentError::Auth(msg) => assert!(msg.contains("Incorrect API key")),
            other => panic!("expected Auth, got {:?}", other),
        }
    }
}

#[test]
fn test_classify_server_errors_are_retryable() {
    for status in [500, 502, 503, 504] {
        let err = HttpErrorMapper::classify(status, None, "busy");
        assert!(err.is_retryable(), "status {} should be retryable", status);
    }
}

#[test]
fn test_classify_client_error_not_retryable() {
    let body = r#"{"error": {"type": "invalid_request_error", "message": "bad tools"}}"#;
    match HttpErrorMapper::classify(400, None, body) {
        AgentError::Transport { message, retryable } => {
            assert!(message.contains("400"));
            assert!(message.contains("invalid_request_error: bad tools"));
            assert!(!retryable);
        }
        other => panic!("expected Transport, got {:?}", other),
    }
}

#[test]
fn test_classify_plain_text_body() {
    match HttpErrorMapper::classify(404, None, "not here") {
        AgentError::Transport { message, .. } => {
            assert_eq!(message, "API error (404): not here");
        }
        other => panic!("expected Transport, got {:?}", other),
    }
}
