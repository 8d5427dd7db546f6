//! Conversions from rule and builder errors to [`TugportError`].

use tugport_core::error::TugportError;

use crate::error::RuleError;
use crate::renames::RenameTableError;

impl From<RuleError> for TugportError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::InvalidConfiguration { .. } => TugportError::invalid_args(err.to_string()),
            RuleError::Ledger(inner) => TugportError::from(inner),
            RuleError::Sink(_) => TugportError::ApplyError {
                message: err.to_string(),
                file: None,
            },
            RuleError::StructuralInvariant { .. } => TugportError::internal(err.to_string()),
        }
    }
}

impl From<RenameTableError> for TugportError {
    fn from(err: RenameTableError) -> Self {
        match err {
            RenameTableError::TypeResolution(inner) => TugportError::type_not_found(inner.name),
            RenameTableError::Record(inner) => TugportError::from(inner),
            RenameTableError::Io { ref path, ref source }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                TugportError::file_not_found(path.to_string_lossy())
            }
            RenameTableError::Io { ref path, .. } => TugportError::ApplyError {
                message: err.to_string(),
                file: Some(path.to_string_lossy().into_owned()),
            },
            RenameTableError::Walk(ref inner) => {
                let not_found = inner
                    .io_error()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
                match inner.path() {
                    Some(path) if not_found => TugportError::file_not_found(path.to_string_lossy()),
                    _ => TugportError::internal(err.to_string()),
                }
            }
        }
    }
}
