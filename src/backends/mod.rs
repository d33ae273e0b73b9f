//! Backend implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

#[cfg(feature = "console")]
pub use console::{ConsoleBackend, ConsoleStream};
#[cfg(feature = "file")]
pub use file::FileBackend;
pub use memory::MemoryBackend;

pub use crate::core::{Backend, SharedBackend};
