//! Fully qualified type name to short name resolution.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A declaring type that the lookup does not know.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot resolve type {name}")]
pub struct TypeResolutionError {
    pub name: String,
}

impl TypeResolutionError {
    pub fn new(name: impl Into<String>) -> Self {
        TypeResolutionError { name: name.into() }
    }
}

/// Resolves the unqualified name of a declared type.
pub trait TypeLookup {
    fn short_name(&self, fqn: &str) -> Result<String, TypeResolutionError>;
}

fn last_segment(fqn: &str) -> &str {
    fqn.rsplit('\\').next().unwrap_or(fqn)
}

fn normalize(fqn: &str) -> &str {
    fqn.trim().trim_start_matches('\\')
}

// ============================================================================
// Known types
// ============================================================================

/// A fixed set of declared types.
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    types: HashSet<String>,
}

impl KnownTypes {
    pub fn new() -> Self {
        KnownTypes::default()
    }

    pub fn insert(&mut self, fqn: &str) {
        self.types.insert(normalize(fqn).to_string());
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.types.contains(normalize(fqn))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: KnownTypes) {
        self.types.extend(other.types);
    }
}

impl<S: AsRef<str>> FromIterator<S> for KnownTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut known = KnownTypes::new();
        for fqn in iter {
            known.insert(fqn.as_ref());
        }
        known
    }
}

impl TypeLookup for KnownTypes {
    fn short_name(&self, fqn: &str) -> Result<String, TypeResolutionError> {
        let normalized = normalize(fqn);
        if normalized.is_empty() || !self.types.contains(normalized) {
            return Err(TypeResolutionError::new(fqn));
        }
        Ok(last_segment(normalized).to_string())
    }
}

// ============================================================================
// Declared type index
// ============================================================================

static NAMESPACE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*namespace\s+([A-Za-z_][A-Za-z0-9_\\]*)\s*[;{]").unwrap()
});

static TYPE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(?:(?:abstract|final|readonly)\s+)*(?:class|interface|trait|enum)\s+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .unwrap()
});

/// Types declared by the source files under a directory.
///
/// Built with a textual scan: each `class`, `interface`, `trait` or `enum`
/// declaration belongs to the closest `namespace` declaration above it in the
/// same file.
#[derive(Debug, Clone, Default)]
pub struct DeclaredTypeIndex {
    types: KnownTypes,
}

impl DeclaredTypeIndex {
    /// Scan every file with `extension` under `dir`.
    pub fn scan(dir: &Path, extension: &str) -> Result<Self, std::io::Error> {
        let mut types = KnownTypes::new();
        let mut files = 0usize;
        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != extension) {
                continue;
            }
            let Ok(text) = fs::read_to_string(path) else {
                trace!(path = %path.display(), "skipping unreadable source");
                continue;
            };
            for fqn in declared_types(&text) {
                types.insert(&fqn);
            }
            files += 1;
        }
        debug!(dir = %dir.display(), files, types = types.len(), "indexed declared types");
        Ok(DeclaredTypeIndex { types })
    }

    pub fn from_source(text: &str) -> Self {
        DeclaredTypeIndex {
            types: declared_types(text).collect(),
        }
    }

    pub fn types(&self) -> &KnownTypes {
        &self.types
    }

    pub fn into_types(self) -> KnownTypes {
        self.types
    }
}

impl TypeLookup for DeclaredTypeIndex {
    fn short_name(&self, fqn: &str) -> Result<String, TypeResolutionError> {
        self.types.short_name(fqn)
    }
}

/// Fully qualified names of the types declared in `text`.
fn declared_types(text: &str) -> impl Iterator<Item = String> + '_ {
    let namespaces: Vec<(usize, &str)> = NAMESPACE_DECL
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), caps.get(1)?.as_str()))
        })
        .collect();

    TYPE_DECL.captures_iter(text).filter_map(move |caps| {
        let start = caps.get(0)?.start();
        let name = caps.get(1)?.as_str();
        let namespace = namespaces
            .iter()
            .take_while(|(offset, _)| *offset < start)
            .last()
            .map(|(_, namespace)| *namespace);
        Some(match namespace {
            Some(namespace) => format!("{}\\{}", namespace, name),
            None => name.to_string(),
        })
    })
}
