//! Delivery of one encoded record to a level's backends

use super::backend::{Backend, SharedBackend};
use super::encoder::Encoder;
use super::error::{BackendErrors, BackendFailure, BackendOperation};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};

/// Write `encoded` to every backend in order.
///
/// Each backend is written under its own lock. Backends refusing ANSI get a
/// copy stripped by `encoder`, built at most once per record into
/// `stripped`. A failing or panicking backend does not stop delivery to the
/// rest.
pub(crate) fn write_all(
    backends: &[SharedBackend],
    encoder: &dyn Encoder,
    encoded: &[u8],
    stripped: &mut Vec<u8>,
) -> BackendErrors {
    let mut errors = BackendErrors::new();
    let has_ansi = encoder.contains_ansi(encoded);
    let mut stripped_ready = false;

    for (index, backend) in backends.iter().enumerate() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut guard = backend.lock()?;
            let record = if has_ansi && !guard.allow_ansi() {
                if !stripped_ready {
                    stripped.clear();
                    encoder.strip_ansi(encoded, stripped);
                    stripped_ready = true;
                }
                stripped.as_slice()
            } else {
                encoded
            };
            write_record(&mut **guard, record)
        }));

        if let Some(source) = flatten(outcome) {
            errors.push(failure(index, backend, BackendOperation::Write, source));
        }
    }

    errors
}

/// Run `operation` on each distinct backend, collecting failures
pub(crate) fn for_each_distinct(
    backends: &[SharedBackend],
    operation: BackendOperation,
) -> BackendErrors {
    let mut errors = BackendErrors::new();
    for (index, backend) in backends.iter().enumerate() {
        if backends[..index].iter().any(|earlier| earlier.ptr_eq(backend)) {
            continue;
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut guard = backend.lock()?;
            match operation {
                BackendOperation::Write => Ok(()),
                BackendOperation::Sync => guard.sync(),
                BackendOperation::Close => guard.close(),
            }
        }));
        if let Some(source) = flatten(outcome) {
            errors.push(failure(index, backend, operation, source));
        }
    }
    errors
}

fn write_record(backend: &mut dyn Backend, record: &[u8]) -> io::Result<()> {
    let written = backend.write(record)?;
    if written < record.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {} of {} bytes", written, record.len()),
        ));
    }
    Ok(())
}

fn flatten(outcome: std::thread::Result<io::Result<()>>) -> Option<io::Error> {
    match outcome {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(panic_info) => Some(io::Error::other(format!(
            "backend panicked: {}",
            panic_message(&*panic_info)
        ))),
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn failure(
    index: usize,
    backend: &SharedBackend,
    operation: BackendOperation,
    source: io::Error,
) -> BackendFailure {
    BackendFailure {
        index,
        name: backend.name().to_string(),
        operation,
        source,
    }
}
