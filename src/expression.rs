//! Facade for working with one parsed Tally expression.

use std::fmt;

use tally_syntax::ast::{Node, NodeKind};
use tally_syntax::diagnostics::ParseError;
use tally_syntax::fragment::Fragment;
use tally_syntax::{grammar, parser};

/// An expression together with its parsed tree.
///
/// The tree is immutable once constructed; accessors walk it on demand.
#[derive(Debug)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parse `source` with the stock fragment set.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::with_fragments(source, grammar::default_fragments())
    }

    /// Parse `source` with a caller-supplied fragment set.
    pub fn with_fragments(source: &str, fragments: Vec<Fragment>) -> Result<Self, ParseError> {
        let root = parser::parse(source, fragments, false)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The synthetic root of the parsed tree (one child: the top-level expression).
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Paths of every data reference in the expression, in source order.
    pub fn data_references(&self) -> Vec<&str> {
        self.collect(NodeKind::DataReference)
    }

    /// Names of every variable in the expression, in source order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.collect(NodeKind::Variable)
    }

    fn collect(&self, kind: NodeKind) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.walk(&mut |node| {
            if node.kind == kind {
                out.push(node.raw_value.as_str());
            }
        });
        out
    }
}

impl fmt::Display for Expression {
    /// The expression in its original (user input) form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
