//! Core logger types and traits

pub mod ansi;
pub mod backend;
pub(crate) mod buffer;
pub mod config;
pub mod encoder;
pub mod error;
pub(crate) mod fanout;
pub mod field;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod producer;
pub mod timestamp;

pub use backend::{Backend, SharedBackend};
pub use config::{ConfigRegistry, LevelConfig};
pub use encoder::{Encoder, UNSUPPORTED_VALUE};
pub use error::{BackendErrors, BackendFailure, BackendOperation, LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use producer::{FieldProducer, Record};
pub use timestamp::{CompiledTimestamp, TimestampFormat};
