//! Rename-table construction.
//!
//! Given a record file of planned member renames and a module directory,
//! [`RenameTableBuilder`] keeps the renames the module still refers to.

pub mod lookup;
pub mod table;

pub use lookup::{DeclaredTypeIndex, KnownTypes, TypeLookup, TypeResolutionError};
pub use table::{RenameTableBuilder, RenameTableError, SCRATCH_FILE_NAME, SOURCE_EXTENSION};
