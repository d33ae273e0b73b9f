//! Encoder implementations

pub mod json;
pub mod logfmt;

pub use json::JsonEncoder;
pub use logfmt::LogfmtEncoder;

// Re-export the trait alongside its implementations
pub use crate::core::Encoder;
