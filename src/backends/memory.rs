//! In-memory backend for tests and capture

use crate::core::Backend;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Collects records in a shared buffer.
///
/// Clones share the buffer, so a test can keep one handle and pass another
/// to the logger.
///
/// ```
/// use rust_field_logger::backends::MemoryBackend;
/// use rust_field_logger::{FieldProducer, LogLevel, Logger};
///
/// let capture = MemoryBackend::new();
/// let logger = Logger::builder()
///     .with_backend(LogLevel::ANY, capture.clone())
///     .with_fields(LogLevel::ANY, [FieldProducer::message()])
///     .build()
///     .unwrap();
///
/// logger.info("ready").unwrap();
/// assert_eq!(capture.contents(), "msg=ready\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    buffer: Arc<Mutex<Vec<u8>>>,
    ansi: bool,
    name: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept ANSI escapes (refused by default)
    #[must_use]
    pub fn with_ansi(mut self, allow: bool) -> Self {
        self.ansi = allow;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Backend for MemoryBackend {
    fn write(&mut self, record: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(record);
        Ok(record.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn allow_ansi(&self) -> bool {
        self.ansi
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("memory")
    }
}
