// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A closed PHP syntax tree for rule-driven source migration.
//!
//! This crate does not parse or print PHP. Trees are supplied by a tree provider
//! (see [`provider`]) and handed to the rewrite engine in `tugport-rules`, which
//! walks them through [`Node::child_slots`] and dispatches on [`NodeKind`].
//!
//! # Overview
//!
//! - **Nodes**: [`Node`] is a closed enum; every variant owns its children.
//! - **Docblocks**: [`DocBlock`] holds the legacy comment-embedded [`Tag`]s
//!   attached to declarations. Tags carry a stable [`TagId`] so rules can
//!   compare identity rather than names.
//! - **Attributes**: [`AttributeGroupFactory`] builds native attribute groups
//!   from docblock annotations.
//! - **Versions**: [`PhpVersion`] and [`FeatureOracle`] answer whether a
//!   construct is usable for the migration target.
//!
//! # Quick Start
//!
//! ```
//! use tugport_ast::{MatchArm, Node, NodeKind};
//!
//! let stmt = Node::expression(Node::assign(
//!     Node::variable("message"),
//!     Node::match_expr(
//!         Node::variable("statusCode"),
//!         vec![
//!             MatchArm::new(vec![Node::int(400)], Node::string("not found")),
//!             MatchArm::default_arm(Node::string("unknown")),
//!         ],
//!     ),
//! ));
//! assert_eq!(stmt.kind(), NodeKind::Expression);
//! ```

pub mod docblock;
pub use docblock::{AnnotationArg, AnnotationPayload, AnnotationValue, DocBlock, Tag, TagId, TagValue};

pub mod factory;
pub use factory::AttributeGroupFactory;

mod nodes;
pub use nodes::*;

pub mod provider;
pub use provider::{ParseError, TreeParser, TreePrinter};

pub mod version;
pub use version::{Feature, FeatureOracle, PhpVersion, VersionError, VersionTable};
