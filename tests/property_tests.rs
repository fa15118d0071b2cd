//! Property-based tests for rftip_client using proptest

use proptest::prelude::*;
use rftip_client::errors::{classify, ErrorCode, ErrorKind, MessageCatalog};
use rftip_client::http::{HttpResponse, Method, RawFailure, TransportOutcome};
use rftip_client::core::{LogEntry, LogLevel, Logger, LoggerConfig};
use rftip_client::storage::{MemoryStorage, Storage};
use serde_json::json;
use std::time::Duration;

const EXACT_STATUSES: [(u16, ErrorKind); 6] = [
    (401, ErrorKind::Authentication),
    (403, ErrorKind::Authorization),
    (404, ErrorKind::NotFound),
    (409, ErrorKind::Conflict),
    (422, ErrorKind::Validation),
    (429, ErrorKind::RateLimit),
];

fn response_failure(response: HttpResponse) -> RawFailure {
    RawFailure::new(Method::Get, "/tracks", TransportOutcome::Response(response))
}

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
    ]
}

fn server_token() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("TOKEN_EXPIRED".to_string())),
        Just(Some("INVALID_TOKEN".to_string())),
        Just(Some("AUTHENTICATION_FAILED".to_string())),
        Just(Some("PERMISSION_DENIED".to_string())),
        Just(Some("NOT_FOUND".to_string())),
        Just(Some("DATABASE_ERROR".to_string())),
        "[A-Z_]{1,24}".prop_map(Some),
    ]
}

fn quiet_logger(config: LoggerConfig) -> Logger {
    Logger::new(config.with_console(false).with_persistence(false))
}

// ============================================================================
// Classifier
// ============================================================================

proptest! {
    /// Fixed statuses win over any server token
    #[test]
    fn test_exact_status_ignores_token(
        index in 0usize..EXACT_STATUSES.len(),
        token in server_token(),
        message in ".{0,40}",
    ) {
        let (status, kind) = EXACT_STATUSES[index];
        let mut body = json!({"message": message});
        if let Some(token) = token {
            body["code"] = json!(token);
        }
        let error = classify(
            &response_failure(HttpResponse::new(status).with_json(&body)),
            &MessageCatalog::default(),
        );
        prop_assert_eq!(error.kind, kind);
    }

    /// Every status from 500 up is a server failure
    #[test]
    fn test_server_statuses(status in 500u16..=599, structured in any::<bool>()) {
        let response = if structured {
            HttpResponse::new(status).with_json(&json!({"code": "SOMETHING", "message": "broken"}))
        } else {
            HttpResponse::new(status).with_body("<html>bad gateway</html>")
        };
        let error = classify(&response_failure(response), &MessageCatalog::default());
        prop_assert_eq!(error.kind, ErrorKind::Server);
        prop_assert!(error.is_retryable());
    }

    /// No response means NETWORK with code 0, whatever the cause
    #[test]
    fn test_no_response_is_network(message in ".{0,60}", timeout_ms in 1u64..120_000, timed_out in any::<bool>()) {
        let outcome = if timed_out {
            TransportOutcome::Timeout { after: Duration::from_millis(timeout_ms) }
        } else {
            TransportOutcome::failure(message)
        };
        let error = classify(
            &RawFailure::new(Method::Post, "/files", outcome),
            &MessageCatalog::default(),
        );
        prop_assert_eq!(error.kind, ErrorKind::Network);
        prop_assert_eq!(error.code, ErrorCode::NO_RESPONSE);
    }

    /// An error ends the session iff the status is 401 or the server says the token is bad
    #[test]
    fn test_auth_error_iff(status in 400u16..=599, token in server_token()) {
        let body = match &token {
            Some(token) => json!({"code": token, "message": "denied"}),
            None => json!({"message": "denied"}),
        };
        let error = classify(
            &response_failure(HttpResponse::new(status).with_json(&body)),
            &MessageCatalog::default(),
        );

        let expected = status == 401
            || matches!(token.as_deref(), Some("TOKEN_EXPIRED") | Some("INVALID_TOKEN"));
        prop_assert_eq!(error.is_auth_error(), expected);
    }

    /// Classification never panics on arbitrary bodies
    #[test]
    fn test_arbitrary_body(status in 300u16..=599, body in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let error = classify(
            &response_failure(HttpResponse::new(status).with_body(body)),
            &MessageCatalog::default(),
        );
        prop_assert!(!error.message.is_empty());
        if let Some(detail) = &error.detail {
            prop_assert!(detail.chars().count() <= 515);
        }
    }
}

// ============================================================================
// Logger
// ============================================================================

proptest! {
    /// Only the most recent `max` entries survive, in order
    #[test]
    fn test_retention_keeps_most_recent(max in 1usize..50, count in 0usize..150) {
        let logger = quiet_logger(LoggerConfig::default().with_max_stored_entries(max));
        for i in 0..count {
            logger.info(format!("entry {}", i));
        }

        let messages: Vec<String> = logger.entries().into_iter().map(|e| e.message).collect();
        let expected: Vec<String> = (count.saturating_sub(max)..count)
            .map(|i| format!("entry {}", i))
            .collect();
        prop_assert_eq!(messages, expected);
    }

    /// Entries below the minimum level are never stored or persisted
    #[test]
    fn test_min_level_filter(min in any_level(), levels in proptest::collection::vec(any_level(), 0..40)) {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        let logger = Logger::builder()
            .config(LoggerConfig::default().with_console(false).with_min_level(min))
            .storage(storage.clone())
            .build()
            .unwrap();

        for (i, level) in levels.iter().enumerate() {
            logger.log(*level, format!("message {}", i));
        }

        let kept = levels.iter().filter(|level| **level >= min).count();
        prop_assert_eq!(logger.len(), kept);
        prop_assert!(logger.entries().iter().all(|e| e.level >= min));

        if kept > 0 {
            let persisted = storage.get("app_logs").unwrap().unwrap();
            let entries: Vec<LogEntry> = serde_json::from_str(&persisted).unwrap();
            prop_assert!(entries.iter().all(|e| e.level >= min));
        }
    }

    /// LogLevel string conversions roundtrip
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }
}
