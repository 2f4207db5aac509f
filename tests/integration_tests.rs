//! End-to-end tests for the Tally syntax frontend.
//!
//! These exercise the public facade the way a caller would: parse full expressions
//! and inspect the resulting tree shape.

use tally::ast::{Node, NodeKind};
use tally::diagnostics::{ErrorCategory, ParseError};
use tally::{Expression, grammar, parse};

fn only_child(root: &Node) -> &Node {
    assert_eq!(root.children.len(), 1);
    &root.children[0]
}

#[test]
fn parses_a_realistic_indicator_expression() {
    let root = parse(
        "firstNonNull(#{a.b}.yearToDate(), V{x} * 2, [period]) >= 10 && !isNull(#{c})",
        grammar::default_fragments(),
        false,
    )
    .unwrap();

    let and = only_child(&root);
    assert_eq!(and.kind, NodeKind::BinaryOperator);
    assert_eq!(and.raw_value, "&&");

    let ge = &and.children[0];
    assert_eq!(ge.raw_value, ">=");
    let call = &ge.children[0];
    assert_eq!(call.kind, NodeKind::FunctionCall);
    assert_eq!(call.raw_value, "firstNonNull");
    assert_eq!(call.children.len(), 3);

    // The yearToDate modifier ended up inside the data reference, not as a sibling.
    let first_arg = &call.children[0];
    let reference = &first_arg.children[0];
    assert_eq!(reference.kind, NodeKind::DataReference);
    assert_eq!(reference.children.last().unwrap().kind, NodeKind::Modifier);

    let not = &and.children[1];
    assert_eq!(not.kind, NodeKind::UnaryOperator);
    assert_eq!(not.children[0].kind, NodeKind::FunctionCall);
}

#[test]
fn expression_facade_collects_references() {
    let expression = Expression::new("#{num} / #{den} * 100").unwrap();
    assert_eq!(expression.data_references(), vec!["num", "den"]);
    assert!(expression.variable_names().is_empty());
}

#[test]
fn tracked_parse_renders_spans_in_the_tree_listing() {
    let root = parse("1 + 2", grammar::default_fragments(), true).unwrap();
    let listing = root.to_tree_string();
    assert!(listing.contains("binary-operator"));
    assert!(listing.contains("@0..5"), "listing was:\n{listing}");
}

#[test]
fn input_errors_are_distinguishable_from_bugs() {
    let err = parse("", grammar::default_fragments(), false).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::IllegalExpression);

    let err = parse("foo(1)", grammar::default_fragments(), false).unwrap_err();
    assert!(matches!(err, ParseError::UnknownFunction { .. }));
    assert_eq!(err.category(), ErrorCategory::IllegalExpression);
}

#[test]
fn identical_input_fails_identically() {
    let first = parse("1 +", grammar::default_fragments(), false).unwrap_err();
    let second = parse("1 +", grammar::default_fragments(), false).unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
}
