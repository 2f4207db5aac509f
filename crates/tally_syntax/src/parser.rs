//! Tree builder (parse context) for Tally expressions.
//!
//! The builder is a stack machine the scanning driver calls into: every recognized
//! construct arrives as a matched `begin_node`/`end_node` pair, in well-nested order,
//! and the builder turns that call sequence into one rooted tree per parse. The
//! top-level [`parse`] entrypoint then runs the two rewrite passes over the raw tree.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use tally_syntax::{grammar, parser};
//!
//! let tree = parser::parse("#{a} + 1", grammar::default_fragments(), false).unwrap();
//! assert_eq!(tree.children.len(), 1);
//! ```

use std::sync::Arc;

use crate::ast::{self, Node, NodeKind};
use crate::diagnostics::ParseError;
use crate::factory::{NodeConstructor, NodeFactories};
use crate::fragment::{Fragment, FragmentTable};
use crate::passes;
use crate::scanner;

// NOTE: This module is split across multiple files using `include!` to keep the builder
// state machine and the public API in the same Rust module (preserving privacy + call
// patterns) without one large source file.

include!("parser/core.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
