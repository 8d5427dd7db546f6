//! Configuration handling for tugport

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tugport_ast::PhpVersion;

/// Errors loading `tugport.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tugport configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tugport-specific settings
    #[serde(default, alias = "tug")]
    pub tugport: TugportConfig,
}

/// Core tugport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TugportConfig {
    /// Migration target
    #[serde(default = "default_php_version")]
    pub php_version: PhpVersion,

    /// Rules to run, in order. Empty means every catalog rule.
    #[serde(default)]
    pub rules: Vec<String>,

    /// Docblock tag to attribute mappings
    #[serde(default)]
    pub annotation_to_attribute: Vec<MappingRecord>,

    /// Where collected rename records are appended
    #[serde(default)]
    pub record_sink: Option<PathBuf>,

    /// Rename-table builder settings
    #[serde(default)]
    pub renames: RenamesConfig,
}

/// Rename-table builder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamesConfig {
    /// Record file path
    #[serde(default)]
    pub records: Option<PathBuf>,

    /// Module directory to scan
    #[serde(default)]
    pub module: Option<PathBuf>,

    /// Declared fully qualified type names
    #[serde(default)]
    pub known_types: Vec<String>,

    /// Source file extension to concatenate
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_php_version() -> PhpVersion {
    PhpVersion::V8_0
}

fn default_extension() -> String {
    "php".to_string()
}

impl Default for TugportConfig {
    fn default() -> Self {
        Self {
            php_version: default_php_version(),
            rules: Vec::new(),
            annotation_to_attribute: Vec::new(),
            record_sink: None,
            renames: RenamesConfig::default(),
        }
    }
}

impl Default for RenamesConfig {
    fn default() -> Self {
        Self {
            records: None,
            module: None,
            known_types: Vec::new(),
            extension: default_extension(),
        }
    }
}

/// One docblock tag to attribute mapping.
///
/// `tag` is matched against bare tag names (`required`) and against resolved
/// annotation classes. `attribute` defaults to `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl MappingRecord {
    pub fn new(tag: impl Into<String>) -> Self {
        MappingRecord {
            tag: tag.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        MappingRecord {
            tag: tag.into(),
            attribute: Some(attribute.into()),
        }
    }

    /// The attribute class to emit.
    pub fn attribute(&self) -> &str {
        self.attribute.as_deref().unwrap_or(&self.tag)
    }
}

/// Configuration handed to rules: string key to mapping records.
///
/// Unknown keys are ignored by rules; a missing key reads as an empty list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleConfig {
    entries: BTreeMap<String, Vec<MappingRecord>>,
}

impl RuleConfig {
    /// Key read by the annotation-to-attribute rule.
    pub const ANNOTATION_TO_ATTRIBUTE: &'static str = "annotation_to_attribute";

    pub fn new() -> Self {
        RuleConfig::default()
    }

    pub fn with(mut self, key: impl Into<String>, records: Vec<MappingRecord>) -> Self {
        self.entries.insert(key.into(), records);
        self
    }

    pub fn get(&self, key: &str) -> &[MappingRecord] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `tugport.toml` from the given project root, or defaults if absent
    pub fn load_from_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = project_root.join("tugport.toml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// The rule-facing view of this configuration
    pub fn rule_config(&self) -> RuleConfig {
        RuleConfig::new().with(
            RuleConfig::ANNOTATION_TO_ATTRIBUTE,
            self.tugport.annotation_to_attribute.clone(),
        )
    }
}
