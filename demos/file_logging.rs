//! File logging example
//!
//! Demonstrates logging to both console and file backends simultaneously,
//! with colors on the terminal and plain text in the file.
//!
//! Run with: cargo run --example file_logging

use rust_field_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Field Logger - File Logging Example ===\n");

    let logger = Logger::builder()
        .with_level(LogLevel::DEBUG)
        .with_backends(
            LogLevel::ANY,
            [
                SharedBackend::new(ConsoleBackend::stdout()),
                SharedBackend::new(FileBackend::new("application.log")?),
            ],
        )
        .with_fields(
            LogLevel::ANY,
            [
                FieldProducer::datetime(TimestampFormat::Iso8601),
                FieldProducer::level().upper().colored(),
                FieldProducer::message(),
                FieldProducer::field(Field::string("app", "file_logging")),
            ],
        )
        .build()?;

    println!("1. Logging to both console and file:");

    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    logger.info("Configuration loaded successfully")?;
    logger.warn("Using default settings for some options")?;
    logger.info_with("Database connection established", &[Field::int64("pool_size", 8)])?;
    logger.error("Failed to load optional plugin")?;

    println!("\n2. Performing some operations:");

    for i in 1..=5 {
        logger.info_with("Processing item", &[Field::int64("item", i), Field::int64("of", 5)])?;
        if i == 3 {
            logger.warn("Item 3 took longer than expected")?;
        }
    }

    logger.info("All operations completed")?;

    // Flush to disk and close both backends
    logger.shutdown()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}
