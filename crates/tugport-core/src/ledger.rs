//! The auxiliary file ledger.
//!
//! Rules may ask for whole new source files (for example a class of constants
//! they started referencing). Those requests are deduplicated by the pass
//! context and handed to a [`FileLedger`] when the pass completes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use tugport_ast::{Module, TreePrinter};

/// A new source file requested by a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxiliaryFile {
    /// Target path, relative to the ledger root.
    pub path: PathBuf,
    pub module: Module,
}

impl AuxiliaryFile {
    pub fn new(path: impl Into<PathBuf>, module: Module) -> Self {
        AuxiliaryFile {
            path: path.into(),
            module,
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("refusing to overwrite existing file {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for auxiliary files.
pub trait FileLedger {
    /// Whether a file already exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn add_file(&mut self, file: AuxiliaryFile) -> Result<(), LedgerError>;
}

/// Keeps added files in memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    existing: HashSet<PathBuf>,
    added: Vec<AuxiliaryFile>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger::default()
    }

    /// Pretend `path` is already on disk.
    pub fn with_existing(mut self, path: impl Into<PathBuf>) -> Self {
        self.existing.insert(path.into());
        self
    }

    pub fn files(&self) -> &[AuxiliaryFile] {
        &self.added
    }
}

impl FileLedger for MemoryLedger {
    fn exists(&self, path: &Path) -> bool {
        self.existing.contains(path) || self.added.iter().any(|file| file.path == path)
    }

    fn add_file(&mut self, file: AuxiliaryFile) -> Result<(), LedgerError> {
        if self.exists(&file.path) {
            return Err(LedgerError::AlreadyExists { path: file.path });
        }
        self.added.push(file);
        Ok(())
    }
}

/// Renders files with a [`TreePrinter`] and writes them under a root directory.
pub struct FsLedger<P: TreePrinter> {
    root: PathBuf,
    printer: P,
    written: Vec<PathBuf>,
}

impl<P: TreePrinter> FsLedger<P> {
    pub fn new(root: impl Into<PathBuf>, printer: P) -> Self {
        FsLedger {
            root: root.into(),
            printer,
            written: Vec::new(),
        }
    }

    /// Paths written so far, relative to the root.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl<P: TreePrinter> FileLedger for FsLedger<P> {
    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).exists()
    }

    fn add_file(&mut self, file: AuxiliaryFile) -> Result<(), LedgerError> {
        let target = self.root.join(&file.path);
        if target.exists() {
            return Err(LedgerError::AlreadyExists { path: file.path });
        }
        let io_err = |source| LedgerError::Io {
            path: target.clone(),
            source,
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&target, self.printer.print(&file.module)).map_err(io_err)?;
        debug!(path = %target.display(), "wrote auxiliary file");
        self.written.push(file.path);
        Ok(())
    }
}
