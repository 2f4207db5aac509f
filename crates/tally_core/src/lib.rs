//! Provide the canonical language vocabulary for the Tally syntax frontend.
//!
//! This crate is intentionally small and dependency-light. It holds the data the parser
//! and the post-parse passes share but do not own: the operator registry with its
//! precedence and associativity metadata.
//!
//! ## Notes
//!
//! - This is a vocabulary crate: **no IO**, no global state, and no AST types.
//! - Callers work with stable IDs ([`lang::operators::OperatorId`]) and look up
//!   spellings/metadata via registry tables instead of scattering stringly-typed checks.

pub mod lang;
