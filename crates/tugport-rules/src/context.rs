//! Pass-scoped state shared by every rule invocation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use tugport_ast::{Feature, FeatureOracle, PhpVersion};
use tugport_core::config::Config;
use tugport_core::ledger::{AuxiliaryFile, FileLedger};
use tugport_core::records::RenameEntry;
use tugport_core::sink::RecordSink;

use crate::error::RuleError;

/// State owned by one pass over one file.
///
/// Rules receive the context by `&mut` on every call. Auxiliary files are
/// queued here and only handed to the ledger when the pass completes; rename
/// records go straight to the sink. Dropping the context (including on an
/// error path) drops the sink, which flushes it.
pub struct PassContext<'a> {
    file: Option<PathBuf>,
    target: PhpVersion,
    oracle: &'a dyn FeatureOracle,
    ledger: &'a mut dyn FileLedger,
    queued: Vec<AuxiliaryFile>,
    queued_paths: HashSet<PathBuf>,
    sink: Option<RecordSink>,
    recorded: Vec<RenameEntry>,
}

/// What a completed pass left behind.
#[derive(Debug, Default)]
pub struct PassOutput {
    pub emitted: Vec<PathBuf>,
    pub renames: Vec<RenameEntry>,
}

impl<'a> PassContext<'a> {
    pub fn new(
        target: PhpVersion,
        oracle: &'a dyn FeatureOracle,
        ledger: &'a mut dyn FileLedger,
    ) -> Self {
        PassContext {
            file: None,
            target,
            oracle,
            ledger,
            queued: Vec::new(),
            queued_paths: HashSet::new(),
            sink: None,
            recorded: Vec::new(),
        }
    }

    /// A context for the configured migration target.
    ///
    /// When `record_sink` is set, recorded renames are appended to that file.
    pub fn from_config(
        config: &Config,
        oracle: &'a dyn FeatureOracle,
        ledger: &'a mut dyn FileLedger,
    ) -> Result<Self, RuleError> {
        let ctx = PassContext::new(config.tugport.php_version, oracle, ledger);
        match config.tugport.record_sink.as_deref() {
            Some(path) => Ok(ctx.with_sink(RecordSink::open(path)?)),
            None => Ok(ctx),
        }
    }

    /// The path of the file being processed.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Send recorded renames to `sink` as well as keeping them in memory.
    pub fn with_sink(mut self, sink: RecordSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn target(&self) -> PhpVersion {
        self.target
    }

    /// Whether `feature` can be emitted for the migration target.
    pub fn supports(&self, feature: Feature) -> bool {
        self.oracle.is_supported(feature, self.target)
    }

    /// Queue an auxiliary file.
    ///
    /// Returns `false` without queuing when a file with the same path is
    /// already queued this pass or already exists.
    pub fn emit_file(&mut self, file: AuxiliaryFile) -> bool {
        if self.queued_paths.contains(&file.path) {
            trace!(path = %file.path.display(), "auxiliary file already queued");
            return false;
        }
        if self.ledger.exists(&file.path) {
            trace!(path = %file.path.display(), "auxiliary file already exists");
            return false;
        }
        debug!(path = %file.path.display(), "queued auxiliary file");
        self.queued_paths.insert(file.path.clone());
        self.queued.push(file);
        true
    }

    /// Auxiliary files queued so far, in request order.
    pub fn queued_files(&self) -> &[AuxiliaryFile] {
        &self.queued
    }

    /// Record a planned member rename.
    pub fn record_rename(&mut self, entry: RenameEntry) -> Result<(), RuleError> {
        if let Some(sink) = self.sink.as_mut() {
            sink.write(&entry)?;
        }
        trace!(
            declaring_type = %entry.declaring_type,
            old_member = %entry.old_member,
            "recorded rename"
        );
        self.recorded.push(entry);
        Ok(())
    }

    pub fn recorded(&self) -> &[RenameEntry] {
        &self.recorded
    }

    /// Hand queued files to the ledger and flush the sink.
    pub(crate) fn finish(mut self) -> Result<PassOutput, RuleError> {
        let mut emitted = Vec::with_capacity(self.queued.len());
        for file in std::mem::take(&mut self.queued) {
            let path = file.path.clone();
            self.ledger.add_file(file)?;
            emitted.push(path);
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        Ok(PassOutput {
            emitted,
            renames: std::mem::take(&mut self.recorded),
        })
    }
}
