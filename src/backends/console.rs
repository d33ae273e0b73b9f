//! Console backend writing to stdout or stderr

use crate::core::Backend;
use std::io::{self, IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// Writes records to the process's standard output or error stream.
///
/// ANSI escapes are kept only when the stream is a terminal and coloring is
/// not disabled through `colored`'s environment controls (`NO_COLOR`,
/// `CLICOLOR_FORCE`), unless overridden with [`ConsoleBackend::with_ansi`].
#[derive(Debug, Clone, Default)]
pub struct ConsoleBackend {
    stream: ConsoleStream,
    ansi: Option<bool>,
}

impl ConsoleBackend {
    pub fn stdout() -> Self {
        Self::default()
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
            ansi: None,
        }
    }

    /// Force ANSI escapes on or off regardless of the terminal
    ///
    /// # Example
    ///
    /// ```
    /// use rust_field_logger::backends::ConsoleBackend;
    /// use rust_field_logger::Backend;
    ///
    /// let backend = ConsoleBackend::stderr().with_ansi(false);
    /// assert!(!backend.allow_ansi());
    /// ```
    #[must_use]
    pub fn with_ansi(mut self, allow: bool) -> Self {
        self.ansi = Some(allow);
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    fn is_terminal(&self) -> bool {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().is_terminal(),
            ConsoleStream::Stderr => io::stderr().is_terminal(),
        }
    }
}

impl Backend for ConsoleBackend {
    fn write(&mut self, record: &[u8]) -> io::Result<usize> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().lock().write_all(record)?,
            ConsoleStream::Stderr => io::stderr().lock().write_all(record)?,
        }
        Ok(record.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.sync()
    }

    fn allow_ansi(&self) -> bool {
        self.ansi.unwrap_or_else(|| {
            self.is_terminal() && colored::control::SHOULD_COLORIZE.should_colorize()
        })
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}
