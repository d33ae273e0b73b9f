//! Per-level routing example
//!
//! Routes every level to stdout in logfmt while errors and fatals also go,
//! as JSON with extra fields, to stderr.
//!
//! Run with: cargo run --example per_level_routing

use rust_field_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Field Logger - Per-Level Routing Example ===\n");

    let stdout = SharedBackend::new(ConsoleBackend::stdout());
    let stderr = SharedBackend::new(ConsoleBackend::stderr().with_ansi(false));
    let severe = LogLevel::ERROR | LogLevel::FATAL;

    let logger = Logger::builder()
        .with_level(LogLevel::TRACE)
        .with_backend(LogLevel::ANY, stdout.clone())
        .with_backends(severe, [stdout, stderr])
        .with_fields(
            LogLevel::ANY,
            [
                FieldProducer::datetime(TimestampFormat::DateTime),
                FieldProducer::level().upper(),
                FieldProducer::message(),
            ],
        )
        .with_fields(
            severe,
            [
                FieldProducer::datetime(TimestampFormat::UnixMillis).key("ts"),
                FieldProducer::level().key("severity"),
                FieldProducer::message().key("error"),
                FieldProducer::field(Field::string("service", "payments")),
            ],
        )
        .with_encoder(severe, JsonEncoder)
        .with_separator(LogLevel::DEBUG | LogLevel::TRACE, " | ")
        .build()?;

    for level in LogLevel::ALL {
        let config = logger.resolve(level).expect("concrete level");
        println!(
            "{:<5} -> {} backend(s), encoder {}, {} field(s)",
            level.to_str(),
            config.backends().len(),
            config.encoder().name(),
            config.fields().len()
        );
    }
    println!();

    logger.trace("Cache lookup")?;
    logger.debug("Cache miss")?;
    logger.info_with("Charge created", &[Field::int64("amount_cents", 1999)])?;
    logger.warn("Card issuer slow to respond")?;
    logger.error_with(
        "Charge declined",
        &[Field::string("reason", "insufficient_funds"), Field::bool("retryable", false)],
    )?;

    // Fatal is a severity only; the process keeps running
    logger.fatal("Settlement batch aborted")?;

    logger.sync()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
