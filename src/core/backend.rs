//! Backend trait for log output destinations

use parking_lot::{Mutex, MutexGuard};
use std::cell::RefCell;
use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// An output sink for encoded records.
///
/// Backends are driven through [`SharedBackend`], which serializes every
/// call, so implementations never see two writers at once. A backend may
/// log from inside its own methods; if that record routes back to the same
/// backend, the nested write fails with [`io::ErrorKind::WouldBlock`]
/// instead of waiting on the lock it already holds.
pub trait Backend: Send {
    /// Append one encoded record, returning the number of bytes accepted
    fn write(&mut self, record: &[u8]) -> io::Result<usize>;

    /// Flush buffered state; a no-op for unbuffered sinks
    fn sync(&mut self) -> io::Result<()>;

    /// Release underlying resources
    fn close(&mut self) -> io::Result<()>;

    /// Whether ANSI color escapes may be written to this backend.
    /// Queried on every record.
    fn allow_ansi(&self) -> bool;

    /// Identifies the backend in failure reports. Read once, when the
    /// backend is wrapped in a [`SharedBackend`].
    fn name(&self) -> &str;
}

thread_local! {
    /// Backends whose lock this thread holds
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Handle to a backend shared between levels and threads.
///
/// Cloning the handle shares the backend and its lock; passing the same
/// handle to several levels makes them write to one instance.
#[derive(Clone)]
pub struct SharedBackend {
    inner: Arc<Mutex<Box<dyn Backend>>>,
    name: Arc<str>,
}

impl SharedBackend {
    pub fn new<B: Backend + 'static>(backend: B) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn Backend>) -> Self {
        let name = Arc::from(backend.name());
        Self {
            inner: Arc::new(Mutex::new(backend)),
            name,
        }
    }

    fn key(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Exclusive access to the backend for one operation.
    ///
    /// Fails if this thread already holds the backend.
    pub(crate) fn lock(&self) -> io::Result<BackendGuard<'_>> {
        let key = self.key();
        let held = HELD
            .try_with(|held| held.borrow().contains(&key))
            .unwrap_or(false);
        if held {
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "backend is already in use by this thread",
            ));
        }
        let guard = self.inner.lock();
        let _ = HELD.try_with(|held| held.borrow_mut().push(key));
        Ok(BackendGuard { guard, key })
    }

    /// True when both handles refer to the same backend instance
    pub fn ptr_eq(&self, other: &SharedBackend) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lock on a [`SharedBackend`], released on drop
pub(crate) struct BackendGuard<'a> {
    guard: MutexGuard<'a, Box<dyn Backend>>,
    key: usize,
}

impl Deref for BackendGuard<'_> {
    type Target = Box<dyn Backend>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for BackendGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl Drop for BackendGuard<'_> {
    fn drop(&mut self) {
        let _ = HELD.try_with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|&key| key == self.key) {
                held.swap_remove(pos);
            }
        });
    }
}

impl<B: Backend + 'static> From<B> for SharedBackend {
    fn from(backend: B) -> Self {
        SharedBackend::new(backend)
    }
}

impl From<Box<dyn Backend>> for SharedBackend {
    fn from(backend: Box<dyn Backend>) -> Self {
        SharedBackend::from_boxed(backend)
    }
}

impl fmt::Debug for SharedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBackend")
            .field("name", &self.name)
            .field("ptr", &Arc::as_ptr(&self.inner))
            .finish()
    }
}
