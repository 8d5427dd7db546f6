//! Build the table of member renames that still apply to a module.
//!
//! The builder concatenates every source file of the module into a scratch
//! file next to the record file, then keeps a record only if both the old
//! member name and the declaring type's short name occur somewhere in that
//! text. The check is a plain substring search; it does not parse anything.
//!
//! Files are concatenated back to back with no separator, sorted by file name
//! within each directory, so a name may match across a file boundary.
//!
//! The scratch path is fixed. Two builds whose record files share a directory
//! race on it and must not run at the same time.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use memchr::memmem;
use thiserror::Error;
use tracing::{info, trace, warn};
use tugport_core::records::{parse_records, RecordError, RenameEntry};
use walkdir::WalkDir;

use super::lookup::{TypeLookup, TypeResolutionError};

/// Scratch file name, created in the record file's directory.
pub const SCRATCH_FILE_NAME: &str = "merged-module-contents.tmp";

/// Extension of the files that make up a module.
pub const SOURCE_EXTENSION: &str = "php";

/// Error type for [`RenameTableBuilder::build`].
#[derive(Debug, Error)]
pub enum RenameTableError {
    #[error(transparent)]
    TypeResolution(#[from] TypeResolutionError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("walking module directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl RenameTableError {
    fn io(path: &Path, source: io::Error) -> Self {
        RenameTableError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Removes the scratch file when dropped.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn create(dir: &Path) -> Result<(Self, File), RenameTableError> {
        let path = dir.join(SCRATCH_FILE_NAME);
        let file = File::create(&path).map_err(|err| RenameTableError::io(&path, err))?;
        trace!(path = %path.display(), "created scratch file");
        Ok((ScratchFile { path }, file))
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => trace!(path = %self.path.display(), "removed scratch file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to remove scratch file")
            }
        }
    }
}

/// Filters a rename record file down to the entries a module still needs.
pub struct RenameTableBuilder<L: TypeLookup> {
    lookup: L,
    extension: String,
}

impl<L: TypeLookup> RenameTableBuilder<L> {
    pub fn new(lookup: L) -> Self {
        RenameTableBuilder {
            lookup,
            extension: SOURCE_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Read `record_file` and keep the entries whose old member name and type
    /// short name both occur in the sources under `module_dir`.
    ///
    /// Any unresolvable declaring type fails the whole call. The scratch file
    /// is gone when this returns, whatever the result.
    pub fn build(
        &self,
        record_file: &Path,
        module_dir: &Path,
    ) -> Result<Vec<RenameEntry>, RenameTableError> {
        let scratch_dir = match record_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let (scratch, file) = ScratchFile::create(scratch_dir)?;
        let concatenated = self.concatenate(module_dir, file, &scratch.path)?;

        let text = fs::read_to_string(record_file)
            .map_err(|err| RenameTableError::io(record_file, err))?;
        let records = parse_records(&text)?;

        let haystack = fs::read(&scratch.path).map_err(|err| RenameTableError::io(&scratch.path, err))?;

        let mut retained = Vec::new();
        for entry in records {
            let short_name = self.lookup.short_name(&entry.declaring_type)?;
            if !contains(&haystack, &entry.old_member) || !contains(&haystack, &short_name) {
                trace!(
                    declaring_type = %entry.declaring_type,
                    old_member = %entry.old_member,
                    "not referenced by module"
                );
                continue;
            }
            retained.push(entry);
        }

        info!(
            module = %module_dir.display(),
            files = concatenated,
            retained = retained.len(),
            "built rename table"
        );
        Ok(retained)
    }

    /// Append every source file under `module_dir` to `file`. Returns the
    /// number of files copied.
    fn concatenate(
        &self,
        module_dir: &Path,
        file: File,
        scratch_path: &Path,
    ) -> Result<usize, RenameTableError> {
        let mut out = BufWriter::new(file);
        let mut copied = 0;
        for entry in WalkDir::new(module_dir)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().is_none_or(|ext| ext != self.extension.as_str())
            {
                continue;
            }
            let mut source = File::open(path).map_err(|err| RenameTableError::io(path, err))?;
            io::copy(&mut source, &mut out).map_err(|err| RenameTableError::io(scratch_path, err))?;
            copied += 1;
        }
        out.flush()
            .map_err(|err| RenameTableError::io(scratch_path, err))?;
        Ok(copied)
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    memmem::find(haystack, needle.as_bytes()).is_some()
}
