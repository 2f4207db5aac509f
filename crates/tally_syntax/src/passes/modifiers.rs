//! Modifier propagation.
//!
//! A modifier is scanned as a sibling immediately after the node it qualifies
//! (`#{a}.periodOffset(1)` yields `[data-reference, modifier]`). Semantically it
//! belongs *to* that node, so this pass detaches each modifier from its parent's child
//! list and appends it as a trailing child of the nearest preceding qualifiable
//! sibling (data reference, variable, or function call). Consecutive modifiers attach
//! to the same owner in source order; any other intervening sibling clears
//! eligibility, and a modifier with no owner is an input error.
//!
//! Children are processed before their parent's own list is rewritten, so a relocated
//! modifier's subtree is visited exactly once and never re-examined in its new
//! position.

use crate::ast::{Node, NodeKind};
use crate::diagnostics::ParseError;

/// Relocate every modifier in the tree onto the node it qualifies.
pub fn propagate(mut node: Node) -> Result<Node, ParseError> {
    node.children = node
        .children
        .into_iter()
        .map(propagate)
        .collect::<Result<Vec<_>, _>>()?;
    if node.children.iter().any(|child| child.kind == NodeKind::Modifier) {
        node.children = relocate(std::mem::take(&mut node.children))?;
    }
    Ok(node)
}

fn relocate(children: Vec<Node>) -> Result<Vec<Node>, ParseError> {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    // Index into `out` of the sibling currently accepting modifiers.
    let mut owner: Option<usize> = None;
    for child in children {
        if child.kind == NodeKind::Modifier {
            match owner {
                Some(index) => {
                    tracing::debug!(modifier = %child.raw_value, owner = %out[index].kind, "relocating modifier");
                    out[index].add_child(child);
                }
                None => return Err(ParseError::dangling_modifier(child.raw_value, child.span)),
            }
        } else {
            owner = child.kind.is_qualifiable().then_some(out.len());
            out.push(child);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: NodeKind, raw: &str) -> Node {
        Node::new(kind, raw.to_string())
    }

    fn composite(kind: NodeKind, raw: &str, children: Vec<Node>) -> Node {
        let mut node = Node::new(kind, raw.to_string());
        for child in children {
            node.add_child(child);
        }
        node
    }

    #[test]
    fn test_modifier_moves_onto_preceding_data_reference() {
        let root = composite(
            NodeKind::Grouping,
            "",
            vec![
                composite(NodeKind::DataReference, "a", vec![leaf(NodeKind::Identifier, "a")]),
                leaf(NodeKind::Modifier, "yearToDate"),
            ],
        );
        let root = propagate(root).unwrap();
        assert_eq!(root.children.len(), 1);
        let reference = &root.children[0];
        assert_eq!(reference.children.len(), 2);
        assert_eq!(reference.children[1].kind, NodeKind::Modifier);
    }

    #[test]
    fn test_sibling_and_modifier_order_is_preserved() {
        let root = composite(
            NodeKind::Grouping,
            "",
            vec![
                composite(NodeKind::DataReference, "a", vec![]),
                leaf(NodeKind::Modifier, "first"),
                leaf(NodeKind::Modifier, "second"),
                leaf(NodeKind::BinaryOperator, "+"),
                leaf(NodeKind::Integer, "1"),
            ],
        );
        let root = propagate(root).unwrap();
        let order: Vec<&str> = root.children.iter().map(|c| c.raw_value.as_str()).collect();
        assert_eq!(order, vec!["a", "+", "1"]);
        let modifiers: Vec<&str> = root.children[0]
            .children
            .iter()
            .map(|c| c.raw_value.as_str())
            .collect();
        assert_eq!(modifiers, vec!["first", "second"]);
    }

    #[test]
    fn test_function_call_and_variable_are_qualifiable() {
        for kind in [NodeKind::FunctionCall, NodeKind::Variable] {
            let root = composite(
                NodeKind::Grouping,
                "",
                vec![composite(kind, "f", vec![]), leaf(NodeKind::Modifier, "m")],
            );
            let root = propagate(root).unwrap();
            assert_eq!(root.children.len(), 1);
            assert_eq!(root.children[0].children.len(), 1);
        }
    }

    #[test]
    fn test_modifier_without_owner_is_an_error() {
        let root = composite(
            NodeKind::Grouping,
            "",
            vec![leaf(NodeKind::Integer, "1"), leaf(NodeKind::Modifier, "m")],
        );
        let err = propagate(root).unwrap_err();
        assert!(matches!(err, ParseError::DanglingModifier { ref name, .. } if name == "m"));
    }

    #[test]
    fn test_modifier_first_in_list_is_an_error() {
        let root = composite(NodeKind::Grouping, "", vec![leaf(NodeKind::Modifier, "m")]);
        assert!(propagate(root).is_err());
    }

    #[test]
    fn test_intervening_sibling_clears_eligibility() {
        let root = composite(
            NodeKind::Grouping,
            "",
            vec![
                composite(NodeKind::DataReference, "a", vec![]),
                leaf(NodeKind::BinaryOperator, "+"),
                leaf(NodeKind::Integer, "1"),
                leaf(NodeKind::Modifier, "m"),
            ],
        );
        assert!(propagate(root).is_err());
    }

    #[test]
    fn test_relocation_inside_nested_grouping() {
        let inner = composite(
            NodeKind::Grouping,
            "",
            vec![
                composite(NodeKind::DataReference, "a", vec![]),
                leaf(NodeKind::Modifier, "m"),
            ],
        );
        let root = composite(NodeKind::Grouping, "", vec![inner]);
        let root = propagate(root).unwrap();
        let inner = &root.children[0];
        assert_eq!(inner.children.len(), 1);
        assert_eq!(inner.children[0].children.len(), 1);
    }

    #[test]
    fn test_tree_without_modifiers_is_unchanged() {
        let root = composite(
            NodeKind::Grouping,
            "",
            vec![
                leaf(NodeKind::Integer, "1"),
                leaf(NodeKind::BinaryOperator, "+"),
                leaf(NodeKind::Integer, "2"),
            ],
        );
        let before = root.clone();
        assert_eq!(propagate(root).unwrap(), before);
    }
}
