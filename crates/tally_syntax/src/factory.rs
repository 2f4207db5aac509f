//! Node factory registry.
//!
//! Maps every [`NodeKind`] to the constructor that turns `(kind, raw_value)` into a
//! fresh, childless node. The table is keyed by the kind's discriminant, so dispatch is
//! an array index rather than dynamic lookup, and overriding one kind never touches the
//! shared default table: each [`crate::parser::TreeBuilder`] owns a copy seeded from
//! [`NodeFactories::default`].
//!
//! Whether a kind may own children is a property of the kind itself
//! ([`NodeKind::is_composite`]); the tree builder enforces it when nesting.

use crate::ast::{Node, NodeKind};
use crate::diagnostics::ParseError;

/// Constructor for one node kind.
pub type NodeConstructor = fn(NodeKind, String) -> Node;

/// Kind-indexed table of node constructors.
#[derive(Clone)]
pub struct NodeFactories {
    table: [Option<NodeConstructor>; NodeKind::COUNT],
}

impl Default for NodeFactories {
    /// Build the stock table with one constructor per kind in the closed enumeration.
    fn default() -> Self {
        let mut table: [Option<NodeConstructor>; NodeKind::COUNT] = [None; NodeKind::COUNT];
        for kind in NodeKind::ALL {
            table[kind as usize] = Some(Node::new as NodeConstructor);
        }
        Self { table }
    }
}

impl NodeFactories {
    /// Install or override the constructor for `kind`.
    pub fn register(&mut self, kind: NodeKind, constructor: NodeConstructor) {
        self.table[kind as usize] = Some(constructor);
    }

    /// Instantiate a childless node of `kind`.
    ///
    /// ## Errors
    /// Returns [`ParseError::UnsupportedKind`] if no constructor is registered.
    pub fn create(&self, kind: NodeKind, raw_value: String) -> Result<Node, ParseError> {
        match self.table[kind as usize] {
            Some(constructor) => Ok(constructor(kind, raw_value)),
            None => Err(ParseError::UnsupportedKind { kind }),
        }
    }
}
