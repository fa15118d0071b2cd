//! Log export example
//!
//! Persists the log history to a directory, reloads it in a second logger and
//! writes JSON and gzip export bundles.
//!
//! Run with: cargo run --example log_export

use rftip_client::core::LogExport;
use rftip_client::prelude::*;
use rftip_client::storage::FileStorage;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== rftip client - Log Export Example ===\n");

    let dir = std::env::temp_dir().join("rftip_log_export_demo");
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.join("storage"))?);

    println!("1. Recording history:");
    let logger = Logger::builder()
        .console(false)
        .max_stored_entries(50)
        .storage(storage.clone())
        .build()?;
    for i in 0..60 {
        logger.info(format!("Track batch {} processed", i));
    }
    logger.api_request("GET", "/tracks", LogContext::new().with_field("requestId", "req_1"));
    println!("   stored {} entries (bounded to 50)", logger.len());

    println!("\n2. Reloading after a restart:");
    let reloaded = Logger::builder()
        .console(false)
        .max_stored_entries(50)
        .storage(storage)
        .build()?;
    println!("   reloaded {} entries", reloaded.len());

    println!("\n3. Exporting:");
    let path = reloaded.write_export(&dir)?;
    println!("   wrote {}", path.display());

    let bundle = LogExport::from_json(&reloaded.export()?)?;
    let gzipped = reloaded.export_gzip()?;
    println!("   session {} with {} logs", bundle.session_id, bundle.logs.len());
    println!("   gzip export: {} bytes", gzipped.len());

    let stats = reloaded.stats();
    println!("   stats: {} total, session {}", stats.total, stats.session_id);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
