//! Operator regrouping.
//!
//! The scanner emits operators as childless nodes in a flat sibling run
//! (`1+2*3` arrives as `[1, +, 2, *, 3]`), so the raw tree carries no precedence
//! structure. This pass rebuilds each run into a single node by precedence climbing
//! over an operator table: the highest-precedence operator combines with its
//! neighboring operand(s) first, equal precedence is broken by associativity, and a
//! prefix operator always takes the single operand to its right before any infix
//! operator gets it.
//!
//! The pass is bottom-up (children regroup before their parent) and idempotent: once
//! operators own their operands they count as ordinary operands and are never
//! reshaped again.

use std::collections::VecDeque;

use tally_core::lang::operators::{self, Associativity, Fixity, OperatorInfo};

use crate::ast::{Node, NodeKind, Span};
use crate::diagnostics::ParseError;

/// Regroup every operator run in the tree using the default operator registry.
pub fn regroup(node: Node) -> Result<Node, ParseError> {
    regroup_with(node, operators::OPERATORS)
}

/// Regroup with a caller-supplied precedence table.
pub fn regroup_with(mut node: Node, table: &[OperatorInfo]) -> Result<Node, ParseError> {
    node.children = node
        .children
        .into_iter()
        .map(|child| regroup_with(child, table))
        .collect::<Result<Vec<_>, _>>()?;

    if node.children.iter().any(is_operator_leaf) {
        let run = std::mem::take(&mut node.children);
        tracing::debug!(parent = %node.kind, len = run.len(), "regrouping operator run");
        node.children.push(reduce_run(run, table)?);
    }

    // Expression positions must reduce to a single node; two operands with no
    // operator between them would otherwise survive silently.
    if matches!(node.kind, NodeKind::Grouping | NodeKind::Argument) && node.children.len() > 1 {
        return Err(ParseError::malformed_run(
            "operands without an operator between them",
            node.children[1].span,
        ));
    }
    Ok(node)
}

/// A childless operator node, i.e. one the scanner emitted but no pass has bound yet.
fn is_operator_leaf(node: &Node) -> bool {
    node.kind.is_operator() && node.children.is_empty()
}

fn reduce_run(run: Vec<Node>, table: &[OperatorInfo]) -> Result<Node, ParseError> {
    let mut queue: VecDeque<Node> = VecDeque::from(run);
    let node = parse_infix(&mut queue, 0, table)?;
    if let Some(extra) = queue.front() {
        return Err(ParseError::malformed_run(
            "operands without an operator between them",
            extra.span,
        ));
    }
    Ok(node)
}

/// Precedence climbing over the remaining run.
fn parse_infix(queue: &mut VecDeque<Node>, min_precedence: u8, table: &[OperatorInfo]) -> Result<Node, ParseError> {
    let mut lhs = parse_operand(queue, table)?;
    loop {
        let next = match queue.front() {
            Some(front) if front.kind == NodeKind::BinaryOperator && front.children.is_empty() => {
                let info = operators::lookup_in(table, &front.raw_value, Fixity::Infix).ok_or_else(|| {
                    ParseError::malformed_run(
                        format!("unknown binary operator '{}'", front.raw_value),
                        front.span,
                    )
                })?;
                if info.precedence < min_precedence {
                    None
                } else {
                    Some((info.precedence, info.associativity))
                }
            }
            _ => None,
        };
        let Some((precedence, associativity)) = next else {
            break;
        };
        let Some(mut operator) = queue.pop_front() else {
            break;
        };
        let tighter = match associativity {
            Associativity::Left => precedence + 1,
            Associativity::Right => precedence,
        };
        let rhs = parse_infix(queue, tighter, table)?;
        operator.span = merged(operator.span, merged(lhs.span, rhs.span));
        operator.add_child(lhs);
        operator.add_child(rhs);
        lhs = operator;
    }
    Ok(lhs)
}

/// One operand: leading prefix operators bind tighter than any infix operator, so
/// each takes exactly the operand to its right.
fn parse_operand(queue: &mut VecDeque<Node>, table: &[OperatorInfo]) -> Result<Node, ParseError> {
    let Some(node) = queue.pop_front() else {
        return Err(ParseError::malformed_run("operator is missing an operand", None));
    };
    if node.kind == NodeKind::UnaryOperator && node.children.is_empty() {
        operators::lookup_in(table, &node.raw_value, Fixity::Prefix).ok_or_else(|| {
            ParseError::malformed_run(format!("unknown unary operator '{}'", node.raw_value), node.span)
        })?;
        let operand = parse_operand(queue, table)?;
        let mut operator = node;
        operator.span = merged(operator.span, operand.span);
        operator.add_child(operand);
        return Ok(operator);
    }
    if node.kind == NodeKind::BinaryOperator && node.children.is_empty() {
        return Err(ParseError::malformed_run(
            format!("operator '{}' is missing its left operand", node.raw_value),
            node.span,
        ));
    }
    Ok(node)
}

fn merged(a: Option<Span>, b: Option<Span>) -> Option<Span> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
