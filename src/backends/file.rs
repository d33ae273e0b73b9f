//! File backend with buffered appends

use crate::core::{Backend, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends records to a file.
///
/// Writes are buffered; [`Backend::sync`] flushes the buffer and asks the
/// OS to persist the data. After [`Backend::close`] further writes fail.
pub struct FileBackend {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    name: String,
}

impl FileBackend {
    /// Open `path` for appending, creating it if needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            name: format!("file:{}", path.display()),
            path,
        })
    }

    /// Like [`FileBackend::new`], truncating existing content
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            name: format!("file:{}", path.display()),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other(format!("{} is closed", self.name)))
    }
}

impl Backend for FileBackend {
    fn write(&mut self, record: &[u8]) -> io::Result<usize> {
        self.writer()?.write_all(record)?;
        Ok(record.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => {
                writer.flush()?;
                writer.get_ref().sync_data()
            }
            None => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => {
                writer.flush()?;
                writer.get_ref().sync_data()
            }
            None => Ok(()),
        }
    }

    fn allow_ansi(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        if let Some(ref mut writer) = self.writer {
            let _ = writer.flush();
        }
    }
}
