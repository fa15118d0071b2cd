//! Basic logger usage example
//!
//! Demonstrates leveled logging, context fields and the log statistics.
//!
//! Run with: cargo run --example basic_usage

use rftip_client::prelude::*;
use rftip_client::{info, warn};

fn main() -> Result<()> {
    println!("=== rftip client - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .config(LoggerConfig::development())
        .storage(std::sync::Arc::new(MemoryStorage::new()))
        .build()?;

    println!("1. Logging at different levels:");
    logger.debug("Radar feed connected");
    logger.info("Dashboard loaded");
    logger.warn("Track 17 lost signal");
    logger.error("Zone sync failed");
    logger.critical("Fusion service unreachable");

    println!("\n2. Raising the minimum level to WARNING:");
    logger.set_min_level(LogLevel::Warning);
    logger.info("Hidden: below the minimum level");
    warn!(logger, "Visible: {} tracks stale", 3);

    println!("\n3. Context fields and typed helpers:");
    logger.set_min_level(LogLevel::Debug);
    logger.info_with_context(
        "Zone created",
        LogContext::new().with_field("zoneId", 7i64).with_field("name", "harbour"),
    );
    logger.user_action("open_track", LogContext::new().with_field("trackId", 17i64));
    info!(logger, "Session {} ready", logger.session_id());

    println!("\n4. Statistics:");
    let stats = logger.stats();
    println!("   total entries: {}", stats.total);
    for (level, count) in &stats.by_level {
        println!("   {:<8} {}", level.to_str(), count);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
