//! Append-only rename record sink.
//!
//! A sink is owned by one pass. Records are buffered and written to the record
//! file when the sink is flushed or dropped, so every exit path of a pass
//! leaves a complete file behind.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::records::{format_record, RenameEntry};

/// Buffered writer of rename records.
#[derive(Debug)]
pub struct RecordSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl RecordSink {
    /// Open `path` for append, creating it if needed.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "opened record sink");
        Ok(RecordSink {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written through this sink.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, entry: &RenameEntry) -> io::Result<()> {
        writeln!(self.writer, "{}", format_record(entry))?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for RecordSink {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(path = %self.path.display(), error = %e, "failed to flush record sink");
        }
    }
}
