// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PHP version abstraction for version-aware rules.
//!
//! This module provides [`PhpVersion`] (the migration target), [`Feature`]
//! (language constructs that appeared in a given release) and the
//! [`FeatureOracle`] trait rules use to ask "can I emit this construct for the
//! current target?".
//!
//! # Example
//!
//! ```
//! use tugport_ast::{Feature, FeatureOracle, PhpVersion, VersionTable};
//!
//! let oracle = VersionTable;
//! assert!(oracle.is_supported(Feature::Attributes, PhpVersion::V8_0));
//! assert!(!oracle.is_supported(Feature::Attributes, PhpVersion::V7_4));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target PHP language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhpVersion {
    /// Every construct is allowed; no version gating.
    Permissive,

    /// A specific release (e.g., 8.0).
    V {
        /// Major version number.
        major: u8,
        /// Minor version number.
        minor: u8,
    },
}

impl PhpVersion {
    /// PHP 7.4 - arrow functions, typed properties.
    pub const V7_4: Self = Self::V { major: 7, minor: 4 };

    /// PHP 8.0 - attributes, match expressions, nullsafe operator.
    pub const V8_0: Self = Self::V { major: 8, minor: 0 };

    /// PHP 8.1 - enums, readonly properties.
    pub const V8_1: Self = Self::V { major: 8, minor: 1 };

    /// PHP 8.2 - readonly classes.
    pub const V8_2: Self = Self::V { major: 8, minor: 2 };

    /// Returns whether this is the permissive mode.
    #[must_use]
    pub fn is_permissive(self) -> bool {
        matches!(self, Self::Permissive)
    }

    /// Returns the major and minor version numbers, if this is a specific version.
    #[must_use]
    pub fn version_tuple(self) -> Option<(u8, u8)> {
        match self {
            Self::Permissive => None,
            Self::V { major, minor } => Some((major, minor)),
        }
    }

    /// Whether this version is at least `other`. Permissive satisfies everything.
    #[must_use]
    pub fn is_at_least(self, other: PhpVersion) -> bool {
        match (self.version_tuple(), other.version_tuple()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(ours), Some(theirs)) => ours >= theirs,
        }
    }
}

impl Default for PhpVersion {
    /// Returns [`PhpVersion::Permissive`] as the default.
    fn default() -> Self {
        Self::Permissive
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::V { major, minor } => write!(f, "{}.{}", major, minor),
        }
    }
}

/// Error parsing a version string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid PHP version '{input}': expected 'permissive' or '<major>.<minor>'")]
pub struct VersionError {
    pub input: String,
}

impl FromStr for PhpVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("permissive") {
            return Ok(PhpVersion::Permissive);
        }
        let err = || VersionError {
            input: s.to_string(),
        };
        let (major, minor) = trimmed.split_once('.').ok_or_else(err)?;
        let major = major.parse::<u8>().map_err(|_| err())?;
        let minor = minor.parse::<u8>().map_err(|_| err())?;
        Ok(PhpVersion::V { major, minor })
    }
}

impl TryFrom<String> for PhpVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhpVersion> for String {
    fn from(value: PhpVersion) -> Self {
        value.to_string()
    }
}

/// Language constructs whose availability depends on the target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    ArrowFunctions,
    TypedProperties,
    Attributes,
    MatchExpression,
    NullsafeOperator,
    Enums,
    ReadonlyProperties,
}

impl Feature {
    /// The first release that supports this construct.
    pub fn introduced_in(self) -> PhpVersion {
        match self {
            Feature::ArrowFunctions | Feature::TypedProperties => PhpVersion::V7_4,
            Feature::Attributes | Feature::MatchExpression | Feature::NullsafeOperator => {
                PhpVersion::V8_0
            }
            Feature::Enums | Feature::ReadonlyProperties => PhpVersion::V8_1,
        }
    }
}

/// Answers whether a construct is usable for a migration target.
pub trait FeatureOracle {
    fn is_supported(&self, feature: Feature, target: PhpVersion) -> bool;
}

/// The release table: a feature is supported from the version that introduced it.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionTable;

impl FeatureOracle for VersionTable {
    fn is_supported(&self, feature: Feature, target: PhpVersion) -> bool {
        target.is_at_least(feature.introduced_in())
    }
}
