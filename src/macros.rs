//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The message is
//! only formatted when the level is enabled, so disabled calls cost one
//! bitmask test. Each macro evaluates to the logging call's `Result`.
//!
//! # Examples
//!
//! ```
//! use rust_field_logger::prelude::*;
//! use rust_field_logger::info;
//!
//! let capture = MemoryBackend::new();
//! let logger = Logger::builder()
//!     .with_backend(LogLevel::ANY, capture.clone())
//!     .with_fields(LogLevel::ANY, [FieldProducer::message()])
//!     .build()?;
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//!
//! assert_eq!(
//!     capture.lines(),
//!     vec!["msg=\"Server started\"", "msg=\"Server listening on port 8080\""]
//! );
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_field_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_field_logger::log;
/// log!(logger, LogLevel::INFO, "Simple message").unwrap();
/// log!(logger, LogLevel::ERROR, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, &::std::format!($($arg)+))
        } else {
            ::std::result::Result::<(), $crate::LoggerError>::Ok(())
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_field_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_field_logger::info;
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::WARN, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message. Does not terminate the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::FATAL, $($arg)+)
    };
}
