//! Basic logger usage example
//!
//! Builds GELF records in dry-run mode and prints them as they would be
//! pushed. Set `RADIS_DRY_RUN=0` with a Redis server on `RADIS_SERVER` to
//! push for real.
//!
//! Run with: cargo run --example basic_usage

use radis_logger::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Print the record the last call built, as it would be pushed
fn print_last(logger: &mut Logger) -> Result<()> {
    if let Some(record) = logger.take_last_record() {
        println!("   {}", record.to_json()?);
    }
    Ok(())
}

fn main() -> Result<()> {
    println!("=== Radis Logger - Basic Usage Example ===\n");

    let mut config = LoggerConfig::from_env()?;
    if std::env::var("RADIS_DRY_RUN").is_err() {
        config.dry_run = true;
    }
    let mut logger = LoggerBuilder::from_config(config).build()?;

    // Fields added to every record
    logger.set_default("service", "basic-usage");
    let counter = Arc::new(AtomicI64::new(0));
    let seq = Arc::clone(&counter);
    logger.set_default(
        "seq",
        ContextValue::producer(move || seq.fetch_add(1, Ordering::SeqCst)),
    );

    println!("1. Logging at different levels:");
    logger.emergency("This is an emergency message", Context::new());
    print_last(&mut logger)?;
    logger.error("This is an error message", Context::new());
    print_last(&mut logger)?;
    logger.info("This is an info message", Context::new());
    print_last(&mut logger)?;
    logger.debug("This is a debug message", Context::new());
    print_last(&mut logger)?;

    println!("2. Structured context and multi-line messages:");
    logger.info(
        "Request handled\nstatus=200\nbody omitted",
        context! {
            "user" => context! { "id" => 42, "roles" => vec!["admin", "dev"] },
            "latency_ms" => 12.5,
        },
    );
    print_last(&mut logger)?;

    println!("3. Forking onto another queue:");
    let mut audit = logger.fork("audit")?;
    audit.notice("Audit trail entry", context! { "actor" => "alice" });
    print_last(&mut audit)?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
