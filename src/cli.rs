//! CLI front door.
//!
//! Library-level implementations of the `tugport` subcommands. Each function
//! takes the loaded [`Config`] plus any command-line overrides and returns the
//! response that `main.rs` serializes to stdout.
//!
//! All functions return `Result<T, TugportError>` so the binary can map
//! failures to stable exit codes.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use tugport_core::config::Config;
use tugport_core::error::TugportError;
use tugport_core::output::{RenamesResponse, RulesResponse};
use tugport_rules::renames::{DeclaredTypeIndex, KnownTypes};
use tugport_rules::{RenameTableBuilder, RuleSet};

/// Command-line overrides for `tugport renames`.
#[derive(Debug, Clone, Default)]
pub struct RenamesArgs {
    pub records: Option<PathBuf>,
    pub module: Option<PathBuf>,
    /// Directory scanned for type declarations. Defaults to the module.
    pub types: Option<PathBuf>,
}

/// Load `path` if given, otherwise `tugport.toml` from `project_root`.
pub fn load_config(path: Option<&Path>, project_root: &Path) -> Result<Config, TugportError> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_from_project(project_root)?,
    };
    debug!(php_version = %config.tugport.php_version, "loaded configuration");
    Ok(config)
}

/// Build the rename table for a record file and a module directory.
///
/// Paths on the command line win over `[tugport.renames]`. Declaring types
/// resolve against `known_types` from the configuration plus every type
/// declared under the types directory.
pub fn run_renames(config: &Config, args: &RenamesArgs) -> Result<RenamesResponse, TugportError> {
    let renames = &config.tugport.renames;
    let records = args
        .records
        .clone()
        .or_else(|| renames.records.clone())
        .ok_or_else(|| TugportError::invalid_args("no record file given (--records)"))?;
    let module = args
        .module
        .clone()
        .or_else(|| renames.module.clone())
        .ok_or_else(|| TugportError::invalid_args("no module directory given (--module)"))?;

    if !records.is_file() {
        return Err(TugportError::file_not_found(records.to_string_lossy()));
    }
    if !module.is_dir() {
        return Err(TugportError::file_not_found(module.to_string_lossy()));
    }

    let types_dir = args.types.as_deref().unwrap_or(&module);
    let mut lookup: KnownTypes = renames.known_types.iter().collect();
    let index = DeclaredTypeIndex::scan(types_dir, &renames.extension).map_err(|err| {
        TugportError::internal(format!("scanning {}: {}", types_dir.display(), err))
    })?;
    lookup.extend(index.into_types());
    debug!(types = lookup.len(), "resolved type lookup");

    let table = RenameTableBuilder::new(lookup)
        .with_extension(renames.extension.clone())
        .build(&records, &module)?;
    info!(retained = table.len(), "rename table ready");

    Ok(RenamesResponse::new(&records, &module, table))
}

/// List the rule catalog, marking the rules the configuration runs.
pub fn run_rules(config: &Config) -> Result<RulesResponse, TugportError> {
    let catalog = RuleSet::standard();
    // Surface configuration errors (unknown rule names, bad mappings) here too.
    catalog.pipeline(config)?;
    Ok(RulesResponse::new(
        config.tugport.php_version.to_string(),
        catalog.info(&config.tugport.rules),
    ))
}
