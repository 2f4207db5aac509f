#![forbid(unsafe_code)]
//! Tally formula language: syntax front-end.
//!
//! Tally expresses calculations over named data references (`#{…}`), variables
//! (`V{…}`), functions, operators, and literals. This crate is the user-facing facade:
//! it re-exports the vocabulary and syntax crates and adds the [`Expression`] wrapper
//! and the CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling: production code uses `Result` with
//! `?`; `.unwrap()` / `.expect()` are acceptable in tests and for true invariants only
//! (with a clear message).
//!
//! ## Examples
//! ```rust,no_run
//! use tally::Expression;
//!
//! let expression = Expression::new("1 + 2 * 3").unwrap();
//! assert_eq!(expression.root().children.len(), 1);
//! ```

pub mod cli;
pub mod expression;

pub use expression::Expression;
pub use tally_core::lang;
pub use tally_syntax::parser::parse;
pub use tally_syntax::{ast, diagnostics, factory, fragment, grammar, parser, passes, scanner};
