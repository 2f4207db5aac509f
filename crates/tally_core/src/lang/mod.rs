//! Tally language vocabulary registries.
//!
//! This module is the front door for language-level vocabulary. Today that is the
//! operator set; the design goal is the same as for any registry-first vocabulary:
//! avoid stringly-typed checks scattered across the parser and tooling. Callers work
//! with **stable IDs** (e.g. `OperatorId`) and look up spellings/metadata via registry
//! tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The scanner enforces syntax; registries provide spellings and metadata for shared
//!   use (regrouping, diagnostics, docs).
//!
//! ## Examples
//! ```rust
//! use tally_core::lang::operators::{self, Fixity, OperatorId};
//!
//! assert_eq!(operators::from_str("+", Fixity::Infix), Some(OperatorId::Add));
//! assert!(operators::info_for(OperatorId::Mul).precedence > operators::info_for(OperatorId::Add).precedence);
//! ```

pub mod operators;
