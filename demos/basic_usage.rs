//! Basic logger usage example
//!
//! Demonstrates a console logger with a field pipeline and different log levels.
//!
//! Run with: cargo run --example basic_usage

use rust_field_logger::prelude::*;
use rust_field_logger::{global, info, warn};

fn main() -> Result<()> {
    println!("=== Rust Field Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .with_level(LogLevel::TRACE)
        .with_backend(LogLevel::ANY, ConsoleBackend::stdout())
        .with_fields(
            LogLevel::ANY,
            [
                FieldProducer::datetime(TimestampFormat::DateTime),
                FieldProducer::level().upper().colored(),
                FieldProducer::message(),
            ],
        )
        .build()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.fatal("This is a fatal message")?;

    println!("\n2. Structured fields:");
    let children = [Field::int64("id", 17), Field::string("region", "eu-west")];
    logger.info_with(
        "order placed",
        &[Field::float64("total", 99.5), Field::group("customer", &children)],
    )?;

    println!("\n3. Formatting macros:");
    let items = 3;
    info!(logger, "Processing {} items", items)?;
    warn!(logger, "Retry {} of {}", 1, 3)?;

    println!("\n4. Default process-wide logger:");
    global::info("Info message via the default logger")?;
    global::debug("Debug message (hidden, default minimum is INFO)")?;
    global::shutdown()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
