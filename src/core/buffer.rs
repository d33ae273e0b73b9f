//! Per-thread reusable record buffers

use std::cell::RefCell;

const INITIAL_CAPACITY: usize = 1024;

/// Buffers larger than this are shrunk after use so one huge record does
/// not pin memory for the life of the thread
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Scratch space for rendering one record
#[derive(Debug, Default)]
pub(crate) struct RecordBuffers {
    /// Encoded record as produced by the encoder
    pub encoded: Vec<u8>,
    /// Copy of `encoded` without ANSI escapes, built on demand
    pub stripped: Vec<u8>,
    /// Text produced by field producers (formatted timestamps, colored levels)
    pub scratch: String,
}

impl RecordBuffers {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            encoded: Vec::with_capacity(capacity),
            stripped: Vec::new(),
            scratch: String::with_capacity(64),
        }
    }

    fn clear(&mut self) {
        self.encoded.clear();
        self.stripped.clear();
        self.scratch.clear();
    }

    fn trim(&mut self) {
        if self.encoded.capacity() > MAX_RETAINED_CAPACITY {
            self.encoded = Vec::with_capacity(INITIAL_CAPACITY);
        }
        if self.stripped.capacity() > MAX_RETAINED_CAPACITY {
            self.stripped = Vec::new();
        }
        if self.scratch.capacity() > MAX_RETAINED_CAPACITY {
            self.scratch = String::new();
        }
    }
}

thread_local! {
    static BUFFERS: RefCell<RecordBuffers> = RefCell::new(RecordBuffers::with_capacity(INITIAL_CAPACITY));
}

/// Run `f` with this thread's record buffers, cleared.
///
/// A re-entrant call (a backend that logs while writing) or a call during
/// thread teardown gets fresh temporary buffers instead.
pub(crate) fn with_buffers<R>(f: impl FnOnce(&mut RecordBuffers) -> R) -> R {
    let mut f = Some(f);
    let pooled = BUFFERS.try_with(|cell| {
        let mut buffers = cell.try_borrow_mut().ok()?;
        let f = f.take()?;
        buffers.clear();
        let result = f(&mut buffers);
        buffers.trim();
        Some(result)
    });

    match (pooled, f.take()) {
        (Ok(Some(result)), _) => result,
        (_, Some(f)) => f(&mut RecordBuffers::default()),
        // `f` is only taken after the buffers were borrowed, and then it
        // always produces a result
        (_, None) => unreachable!("record buffer closure consumed without a result"),
    }
}
