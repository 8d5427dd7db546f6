// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The tree provider seam.
//!
//! Parsing PHP and printing trees back to source belong to an external tree
//! provider. Rules only consume and construct nodes; the auxiliary-file ledger
//! uses a [`TreePrinter`] to render the trees it is asked to write.

use thiserror::Error;

use crate::nodes::Module;

/// Error reported by a tree provider.
#[derive(Debug, Error)]
#[error("parse error at byte {offset}: {message}")]
pub struct ParseError {
    pub offset: u64,
    pub message: String,
}

/// Parses source text into a [`Module`].
pub trait TreeParser {
    fn parse(&self, source: &str) -> Result<Module, ParseError>;
}

/// Renders a [`Module`] back to source text.
pub trait TreePrinter {
    fn print(&self, module: &Module) -> String;
}
