//! # Rust Field Logger
//!
//! A synchronous structured logging core with per-level configuration.
//!
//! ## Features
//!
//! - **Per-level routing**: backends, field pipeline, separator and encoder
//!   are configured per level, with `LogLevel::ANY` as a fallback
//! - **Zero cost when disabled**: a disabled call is one bitmask test
//! - **Streaming encoders**: logfmt and JSON, writing into reusable buffers
//! - **Fan-out**: one record to many backends, with per-backend ANSI stripping
//!   and aggregated failures
//!
//! ```
//! use rust_field_logger::prelude::*;
//!
//! let capture = MemoryBackend::new();
//! let logger = Logger::builder()
//!     .with_backend(LogLevel::ANY, capture.clone())
//!     .with_fields(
//!         LogLevel::ANY,
//!         [
//!             FieldProducer::level().upper(),
//!             FieldProducer::message(),
//!             FieldProducer::field(Field::string("service", "billing")),
//!         ],
//!     )
//!     .build()?;
//!
//! logger.warn_with("slow query", &[Field::float64("secs", 1.5)])?;
//! assert_eq!(capture.contents(), "level=WARN msg=\"slow query\" service=billing secs=1.5\n");
//! # Ok::<(), rust_field_logger::LoggerError>(())
//! ```

pub mod backends;
pub mod core;
pub mod encoders;
pub mod global;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::backends::ConsoleBackend;
    #[cfg(feature = "file")]
    pub use crate::backends::FileBackend;
    pub use crate::backends::MemoryBackend;
    pub use crate::core::{
        Backend, Encoder, Field, FieldProducer, FieldValue, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, Result, SharedBackend, TimestampFormat,
    };
    pub use crate::encoders::{JsonEncoder, LogfmtEncoder};
}

#[cfg(feature = "console")]
pub use backends::ConsoleBackend;
#[cfg(feature = "file")]
pub use backends::FileBackend;
pub use backends::MemoryBackend;
pub use core::{
    Backend, BackendErrors, BackendFailure, BackendOperation, CompiledTimestamp, Encoder, Field,
    FieldProducer, FieldValue, LevelConfig, LogLevel, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, Result, SharedBackend, TimestampFormat,
};
pub use encoders::{JsonEncoder, LogfmtEncoder};
