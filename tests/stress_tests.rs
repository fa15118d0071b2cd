//! Stress tests for concurrent use of the client
//!
//! These tests verify:
//! - Request ids stay unique under many concurrent calls
//! - Concurrent logging keeps every entry and respects the history bound
//! - Notifications pushed from many tasks all expire

use rftip_client::context::ClientContext;
use rftip_client::core::{LogLevel, Logger, LoggerConfig, API_REQUEST_TYPE};
use rftip_client::http::{HttpResponse, ScriptedTransport, TransportOutcome, REQUEST_ID_HEADER};
use rftip_client::notify::NotificationCenter;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn quiet_client(transport: Arc<ScriptedTransport>) -> ClientContext {
    ClientContext::builder()
        .logger_config(
            LoggerConfig::default()
                .with_console(false)
                .with_persistence(false)
                .with_max_stored_entries(5000),
        )
        .transport(transport)
        .build()
        .expect("Failed to build client")
}

fn request_number(header: &str) -> u64 {
    header
        .strip_prefix("req_")
        .and_then(|n| n.parse().ok())
        .expect("request id has the req_<n> shape")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_request_ids_distinct() {
    let transport = Arc::new(ScriptedTransport::new().fallback(
        Duration::from_millis(1),
        TransportOutcome::Response(HttpResponse::new(204)),
    ));
    let client = quiet_client(transport.clone());

    let mut handles = Vec::new();
    for i in 0..1000 {
        let pipeline = client.pipeline().clone();
        handles.push(tokio::spawn(async move {
            pipeline.delete(&format!("/tracks/{}", i)).await
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked").expect("call failed");
    }

    let mut ids: Vec<u64> = transport
        .requests()
        .iter()
        .map(|r| request_number(r.header_value(REQUEST_ID_HEADER).expect("missing id")))
        .collect();
    assert_eq!(ids.len(), 1000);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 1000, "request ids must never repeat");

    assert_eq!(client.logger().entries_by_context_type(API_REQUEST_TYPE).len(), 1000);
}

#[test]
fn test_allocated_ids_strictly_increase_per_thread() {
    let client = quiet_client(Arc::new(ScriptedTransport::new()));
    let pipeline = client.pipeline().clone();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = pipeline.clone();
            thread::spawn(move || {
                (0..500)
                    .map(|_| pipeline.allocate_metadata().request_id)
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        let ids = handle.join().expect("thread panicked");
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        all.extend(ids);
    }
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 4000);
}

#[test]
fn test_concurrent_logging_bounded() {
    let logger = Arc::new(Logger::new(
        LoggerConfig::default()
            .with_console(false)
            .with_min_level(LogLevel::Debug)
            .with_max_stored_entries(1000),
    ));

    let handles: Vec<_> = (0..10)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    logger.log(LogLevel::ALL[i % LogLevel::ALL.len()], format!("thread {} entry {}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(logger.len(), 1000);
    assert_eq!(logger.metrics().total_logged(), 5000);
    assert_eq!(logger.metrics().evicted_count(), 4000);

    // Each thread's surviving entries keep their program order
    let entries = logger.entries();
    for t in 0..10 {
        let prefix = format!("thread {} entry ", t);
        let seen: Vec<usize> = entries
            .iter()
            .filter_map(|e| e.message.strip_prefix(prefix.as_str()))
            .map(|n| n.parse().expect("numeric suffix"))
            .collect();
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }
}

#[tokio::test(start_paused = true)]
async fn test_many_notifications_expire() {
    let center = NotificationCenter::new();

    let mut handles = Vec::new();
    for i in 0..200u64 {
        let center = center.clone();
        handles.push(tokio::spawn(async move {
            center.info(format!("notice {}", i), Some(100 + i))
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("task panicked"));
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 200);
    assert_eq!(center.len(), 200);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(center.is_empty());
}
