//! Process-wide default logger
//!
//! The default logger is built lazily on first use from
//! [`LoggerBuilder::standard`] (when the `console` feature is enabled) and
//! can be replaced at any time. [`shutdown`] flushes and closes its backends;
//! the next use builds a fresh default.
//!
//! ```
//! use rust_field_logger::global;
//! use rust_field_logger::prelude::*;
//!
//! let capture = MemoryBackend::new();
//! global::set_default_logger(
//!     Logger::builder()
//!         .with_backend(LogLevel::ANY, capture.clone())
//!         .with_fields(LogLevel::ANY, [FieldProducer::message()])
//!         .build()?,
//! );
//!
//! global::info("hello")?;
//! global::shutdown()?;
//! assert_eq!(capture.contents(), "msg=hello\n");
//! # Ok::<(), LoggerError>(())
//! ```

use crate::core::{Field, LogLevel, Logger, LoggerBuilder, Result};
use parking_lot::RwLock;
use std::sync::Arc;

static DEFAULT_LOGGER: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);

/// The current default logger, building it on first use
pub fn default_logger() -> Arc<Logger> {
    if let Some(logger) = DEFAULT_LOGGER.read().as_ref() {
        return Arc::clone(logger);
    }

    let mut slot = DEFAULT_LOGGER.write();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(build_default())))
}

fn build_default() -> Logger {
    #[cfg(feature = "console")]
    let builder = LoggerBuilder::standard();
    #[cfg(not(feature = "console"))]
    let builder = LoggerBuilder::new();

    match builder.build() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("[LOGGER ERROR] Failed to build default logger: {}", e);
            fallback_logger()
        }
    }
}

/// A logger with no backends; every call is a no-op
fn fallback_logger() -> Logger {
    match LoggerBuilder::new().build() {
        Ok(logger) => logger,
        Err(_) => unreachable!("a builder without settings always builds"),
    }
}

/// Replace the default logger, returning the previous one if any.
///
/// The previous logger's backends are synced when its last handle drops.
pub fn set_default_logger(logger: Logger) -> Option<Arc<Logger>> {
    DEFAULT_LOGGER.write().replace(Arc::new(logger))
}

/// Flush and close the default logger's backends and reset it
pub fn shutdown() -> Result<()> {
    let Some(logger) = DEFAULT_LOGGER.write().take() else {
        return Ok(());
    };
    let synced = logger.sync();
    let closed = logger.close();
    synced.and(closed)
}

#[inline]
pub fn enabled(level: LogLevel) -> bool {
    default_logger().enabled(level)
}

pub fn log(level: LogLevel, message: &str) -> Result<()> {
    default_logger().log(level, message)
}

pub fn log_with(level: LogLevel, message: &str, fields: &[Field<'_>]) -> Result<()> {
    default_logger().log_with(level, message, fields)
}

pub fn trace(message: &str) -> Result<()> {
    log(LogLevel::TRACE, message)
}

pub fn debug(message: &str) -> Result<()> {
    log(LogLevel::DEBUG, message)
}

pub fn info(message: &str) -> Result<()> {
    log(LogLevel::INFO, message)
}

pub fn warn(message: &str) -> Result<()> {
    log(LogLevel::WARN, message)
}

pub fn error(message: &str) -> Result<()> {
    log(LogLevel::ERROR, message)
}

pub fn fatal(message: &str) -> Result<()> {
    log(LogLevel::FATAL, message)
}

pub fn trace_with(message: &str, fields: &[Field<'_>]) -> Result<()> {
    log_with(LogLevel::TRACE, message, fields)
}

pub fn debug_with(message: &str, fields: &[Field<'_>]) -> Result<()> {
    log_with(LogLevel::DEBUG, message, fields)
}

pub fn info_with(message: &str, fields: &[Field<'_>]) -> Result<()> {
    log_with(LogLevel::INFO, message, fields)
}

pub fn warn_with(message: &str, fields: &[Field<'_>]) -> Result<()> {
    log_with(LogLevel::WARN, message, fields)
}

pub fn error_with(message: &str, fields: &[Field<'_>]) -> Result<()> {
    log_with(LogLevel::ERROR, message, fields)
}

pub fn fatal_with(message: &str, fields: &[Field<'_>]) -> Result<()> {
    log_with(LogLevel::FATAL, message, fields)
}
