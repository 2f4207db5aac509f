//! Node tree for Tally expressions.
//!
//! This module defines the single tree entity ([`Node`]) the whole frontend works on:
//! the tree builder creates nodes, the scanner decides their order, and the rewrite
//! passes detach and reattach children. A node exclusively owns its ordered children,
//! so the tree is acyclic by construction.

use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Return `true` if `other` lies entirely inside this span.
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

// ============================================================================
// Node kinds
// ============================================================================

/// The closed set of syntactic categories a [`Node`] can have.
///
/// ## Notes
/// - Composite kinds own children; simple kinds are leaves. See [`NodeKind::is_composite`].
/// - Operator kinds are scanned as childless leaves and only gain their operands in the
///   regrouping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Composite kinds
    Grouping,
    Argument,
    FunctionCall,
    Modifier,
    DataReference,
    Variable,
    UnaryOperator,
    BinaryOperator,

    // Simple kinds
    String,
    NamedValue,
    Identifier,
    Number,
    Integer,
    Date,
    Boolean,
    Null,
}

impl NodeKind {
    pub const COUNT: usize = 16;

    /// Every kind, in discriminant order.
    pub const ALL: [NodeKind; NodeKind::COUNT] = [
        NodeKind::Grouping,
        NodeKind::Argument,
        NodeKind::FunctionCall,
        NodeKind::Modifier,
        NodeKind::DataReference,
        NodeKind::Variable,
        NodeKind::UnaryOperator,
        NodeKind::BinaryOperator,
        NodeKind::String,
        NodeKind::NamedValue,
        NodeKind::Identifier,
        NodeKind::Number,
        NodeKind::Integer,
        NodeKind::Date,
        NodeKind::Boolean,
        NodeKind::Null,
    ];

    /// Return `true` if nodes of this kind may own children.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            NodeKind::Grouping
                | NodeKind::Argument
                | NodeKind::FunctionCall
                | NodeKind::Modifier
                | NodeKind::DataReference
                | NodeKind::Variable
                | NodeKind::UnaryOperator
                | NodeKind::BinaryOperator
        )
    }

    /// Return `true` if a trailing modifier may attach to nodes of this kind.
    pub fn is_qualifiable(self) -> bool {
        matches!(
            self,
            NodeKind::DataReference | NodeKind::Variable | NodeKind::FunctionCall
        )
    }

    /// Return `true` for the two operator kinds.
    pub fn is_operator(self) -> bool {
        matches!(self, NodeKind::UnaryOperator | NodeKind::BinaryOperator)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Grouping => "grouping",
            NodeKind::Argument => "argument",
            NodeKind::FunctionCall => "function-call",
            NodeKind::Modifier => "modifier",
            NodeKind::DataReference => "data-reference",
            NodeKind::Variable => "variable",
            NodeKind::UnaryOperator => "unary-operator",
            NodeKind::BinaryOperator => "binary-operator",
            NodeKind::String => "string",
            NodeKind::NamedValue => "named-value",
            NodeKind::Identifier => "identifier",
            NodeKind::Number => "number",
            NodeKind::Integer => "integer",
            NodeKind::Date => "date",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A whitespace token skipped by the scanner, kept only when position tracking is on.
#[derive(Debug, Clone, PartialEq)]
pub struct WhitespaceToken {
    pub span: Span,
    pub text: String,
}

/// One node of the expression tree.
///
/// ## Notes
/// - `raw_value` is the literal source text backing leaf kinds; for composite kinds it
///   is advisory (e.g. the function name, the data reference path).
/// - `span` is only present when the parse requested position tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub raw_value: String,
    pub children: Vec<Node>,
    pub span: Option<Span>,
    /// Whitespace attached to this node when tracking positions (annotation only).
    pub whitespace: Vec<WhitespaceToken>,
}

impl Node {
    /// Construct a childless node. This is the default constructor the factory
    /// registry installs for every kind.
    pub fn new(kind: NodeKind, raw_value: String) -> Self {
        Self {
            kind,
            raw_value,
            children: Vec::new(),
            span: None,
            whitespace: Vec::new(),
        }
    }

    /// Append a child, keeping source order.
    pub fn add_child(&mut self, child: Node) {
        debug_assert!(self.kind.is_composite(), "leaf node {} cannot own children", self.kind);
        self.children.push(child);
    }

    pub fn set_start(&mut self, pos: usize) {
        self.span = Some(Span::new(pos, pos));
    }

    pub fn set_end(&mut self, pos: usize) {
        if let Some(span) = &mut self.span {
            span.end = pos;
        }
    }

    /// Visit this node and every descendant, depth-first, in child order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Render the tree as an indented multi-line listing (one node per line).
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        use std::fmt::Write;
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = write!(out, "{}", self.kind);
        if !self.raw_value.is_empty() {
            let _ = write!(out, " {:?}", self.raw_value);
        }
        if let Some(span) = self.span {
            let _ = write!(out, " @{}..{}", span.start, span.end);
        }
        out.push('\n');
        for child in &self.children {
            child.write_tree(out, depth + 1);
        }
    }
}

// ============================================================================
// Whitespace annotation
// ============================================================================

/// Attach skipped whitespace tokens to the tree by position.
///
/// Each token lands on the deepest node whose span contains it. This is a pure
/// annotation step for later reconstruction; the tree shape is unchanged. Tokens are
/// only meaningful when the parse tracked positions, so nodes without spans keep
/// whatever falls through to them at the root.
pub fn attach_whitespace(root: &mut Node, tokens: Vec<WhitespaceToken>) {
    for token in tokens {
        place(root, token);
    }
}

fn place(node: &mut Node, token: WhitespaceToken) {
    for child in &mut node.children {
        if let Some(span) = child.span {
            if span.contains(token.span) {
                place(child, token);
                return;
            }
        }
    }
    node.whitespace.push(token);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge_and_contains() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        assert_eq!(a.merge(b), Span::new(2, 9));
        assert!(Span::new(0, 10).contains(a));
        assert!(!a.contains(b));
    }

    #[test]
    fn test_every_kind_is_listed_once() {
        for (i, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
        }
    }

    #[test]
    fn test_whitespace_lands_on_deepest_node() {
        let mut inner = Node::new(NodeKind::Grouping, String::new());
        inner.span = Some(Span::new(2, 8));
        let mut leaf = Node::new(NodeKind::Integer, "1".to_string());
        leaf.span = Some(Span::new(3, 4));
        inner.add_child(leaf);

        let mut root = Node::new(NodeKind::Grouping, String::new());
        root.span = Some(Span::new(0, 10));
        root.add_child(inner);

        attach_whitespace(
            &mut root,
            vec![
                WhitespaceToken {
                    span: Span::new(5, 6),
                    text: " ".to_string(),
                },
                WhitespaceToken {
                    span: Span::new(9, 10),
                    text: " ".to_string(),
                },
            ],
        );

        assert_eq!(root.whitespace.len(), 1);
        assert_eq!(root.children[0].whitespace.len(), 1);
        assert_eq!(root.children[0].whitespace[0].span, Span::new(5, 6));
    }
}
