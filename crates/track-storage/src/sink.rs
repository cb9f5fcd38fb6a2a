//! Log sinks
//!
//! `CsvLogFile` is the real on-disk sink: buffered appends, one header
//! line, durable on flush. `MemorySink` captures lines for tests and dry
//! runs and can inject write failures.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::{LogSink, StorageError};

/// Buffered CSV file with a fixed header line
pub struct CsvLogFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl CsvLogFile {
    /// Create the file (truncating any leftover with the same name) and
    /// write `header` as its first line. Missing parent directories are
    /// created.
    pub fn create(path: impl Into<PathBuf>, header: &str) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(header.as_bytes())?;
        writer.write_all(b"\n")?;
        info!("Opened log file {}", path.display());
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for CsvLogFile {
    fn append_line(&mut self, line: &str) -> Result<(), StorageError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }
}

/// Shareable in-memory sink for tests and dry runs
#[derive(Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    lines: Vec<String>,
    flushes: usize,
    failing: bool,
    appends_to_fail: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line appended so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lock().lines.clone()
    }

    /// How many times `flush` has been called.
    pub fn flush_count(&self) -> usize {
        self.lock().flushes
    }

    /// Make subsequent appends and flushes fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Fail only the next `n` appends, then recover on their own.
    pub fn fail_next_appends(&self, n: usize) {
        self.lock().appends_to_fail = n;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn append_line(&mut self, line: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.failing {
            return Err(StorageError::Rejected("injected append failure".into()));
        }
        if inner.appends_to_fail > 0 {
            inner.appends_to_fail -= 1;
            return Err(StorageError::Rejected("injected transient failure".into()));
        }
        inner.lines.push(line.to_owned());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.failing {
            return Err(StorageError::Rejected("injected flush failure".into()));
        }
        inner.flushes += 1;
        Ok(())
    }
}
