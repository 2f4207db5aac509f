//! Post-parse tree rewrites.
//!
//! The scanner builds the raw tree in strict source order, which leaves two things a
//! single left-to-right scan cannot get right: modifiers sit as siblings of the node
//! they qualify, and operator runs carry no precedence structure. Each pass here is a
//! pure `Node -> Node` transformation run once, in this order, after the builder
//! finishes:
//!
//! 1. [`modifiers::propagate`]: relocate modifier nodes onto their owner.
//! 2. [`operators::regroup`]: reshape flat operator runs by precedence.

pub mod modifiers;
pub mod operators;
