//! Error pipeline example
//!
//! Replays a few failed calls through the pipeline with a scripted transport
//! and shows how each one is classified and surfaced.
//!
//! Run with: cargo run --example error_pipeline

use rftip_client::http::{
    HttpResponse, MemoryNavigator, ScriptedTransport, TransportOutcome,
};
use rftip_client::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== rftip client - Error Pipeline Example ===\n");

    let transport = ScriptedTransport::new()
        .respond(TransportOutcome::Response(
            HttpResponse::new(200).with_json(&json!([{"id": 1, "name": "harbour"}])),
        ))
        .respond(TransportOutcome::Response(
            HttpResponse::new(422).with_json(&json!({
                "code": "VALIDATION_ERROR",
                "message": "invalid zone",
                "errors": [{"field": "radius", "message": "must be positive"}]
            })),
        ))
        .respond(TransportOutcome::Response(
            HttpResponse::new(429).with_header("Retry-After", "30"),
        ))
        .respond(TransportOutcome::failure("connection refused"))
        .respond_after(
            Duration::from_millis(50),
            TransportOutcome::Response(HttpResponse::new(401)),
        );

    let navigator = Arc::new(MemoryNavigator::new("/zones"));
    let client = ClientContext::builder()
        .logger_config(LoggerConfig::default().with_console(false))
        .transport(Arc::new(transport))
        .navigator(navigator.clone())
        .build()?;
    client.session().set_token("demo-token");

    let pipeline = client.pipeline();
    let dispatcher = client.dispatcher();

    println!("1. Successful call:");
    let zones = dispatcher
        .wrap(
            pipeline.get_json::<serde_json::Value>("/zones"),
            WrapOptions::new().success("Zones loaded"),
        )
        .await;
    println!("   zones: {:?}\n", zones);

    println!("2. Failed calls, classified:");
    for path in ["/zones", "/tracks", "/stats"] {
        match pipeline.post_json::<_, serde_json::Value>(path, &json!({"radius": -1})).await {
            Ok(value) => println!("   {} -> ok {}", path, value),
            Err(error) => {
                let display = error.display(dispatcher.catalog());
                println!("   {} -> {} [{}] {}", path, error.kind, error.code, display.message);
                for field in error.field_errors() {
                    println!("      field {:?}: {}", field.field, field.message);
                }
            }
        }
    }

    println!("\n3. Authentication failure through wrap:");
    let me = dispatcher
        .wrap(pipeline.get_json::<serde_json::Value>("/auth/me"), WrapOptions::new())
        .await;
    println!("   result: {:?}", me);
    println!("   authenticated: {}", client.session().is_authenticated());
    if let Some(redirect) = navigator.last_redirect() {
        println!("   redirected to: {}", redirect.location());
    }

    println!("\n4. Live notifications:");
    for notification in client.notifications().snapshot() {
        println!(
            "   #{} {:<7} {}ms {}",
            notification.id,
            notification.kind.as_str(),
            notification.duration_ms,
            notification.message.replace('\n', " | ")
        );
    }
    println!("   errors dispatched: {}", dispatcher.dispatch_count());

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
