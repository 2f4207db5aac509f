//! Syntax frontend for the Tally formula language: node model, tree builder, scanner,
//! and the two post-parse rewrite passes.
//!
//! A parse has three phases. The scanner consumes the raw text and drives the
//! [`parser::TreeBuilder`] through paired begin/end calls, producing a raw node tree in
//! source order. [`passes::modifiers`] then relocates modifier nodes onto the node they
//! qualify, and [`passes::operators`] reshapes flat operator runs into a tree that obeys
//! the precedence table in `tally_core`.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not evaluate, type-check, or
//!   pretty-print expressions.
//! - Operator identity (spellings, precedence, associativity) comes from
//!   `tally_core::lang::operators`.
//!
//! ## Examples
//! ```rust,no_run
//! use tally_syntax::{grammar, parser};
//!
//! let tree = parser::parse("1 + 2 * 3", grammar::default_fragments(), false).unwrap();
//! assert_eq!(tree.children.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod factory;
pub mod fragment;
pub mod grammar;
pub mod parser;
pub mod passes;
pub mod scanner;
