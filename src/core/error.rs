//! Error types for the logger system

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Configuration targeted bits that name no known level
    #[error("Unknown level bits {bits:#010b} ignored")]
    UnknownLevel { bits: u8 },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// One or more backends failed during a single operation
    #[error("{0}")]
    Backend(BackendErrors),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an unknown level error for the offending bits
    pub fn unknown_level(bits: u8) -> Self {
        LoggerError::UnknownLevel { bits }
    }

    /// The per-backend failures carried by this error, if any
    pub fn backend_failures(&self) -> &[BackendFailure] {
        match self {
            LoggerError::Backend(errors) => errors.failures(),
            _ => &[],
        }
    }
}

/// Backend operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOperation {
    Write,
    Sync,
    Close,
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendOperation::Write => f.write_str("write"),
            BackendOperation::Sync => f.write_str("sync"),
            BackendOperation::Close => f.write_str("close"),
        }
    }
}

/// A single backend's failure within a fan-out
#[derive(Debug)]
pub struct BackendFailure {
    /// Position of the backend in the level's backend set
    pub index: usize,
    /// Name reported by the backend
    pub name: String,
    pub operation: BackendOperation,
    pub source: io::Error,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "backend #{} '{}' {} failed: {}",
            self.index, self.name, self.operation, self.source
        )
    }
}

/// Failures collected across every backend of one call
#[derive(Debug, Default)]
pub struct BackendErrors {
    failures: Vec<BackendFailure>,
}

impl BackendErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: BackendFailure) {
        self.failures.push(failure);
    }

    pub fn failures(&self) -> &[BackendFailure] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// `Ok(())` when nothing failed, otherwise the aggregated error
    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::Backend(self))
        }
    }
}

impl fmt::Display for BackendErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} backend(s) failed: ", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}
