/// Parse an expression into its node tree.
///
/// This is the main public entrypoint. The returned node is the synthetic grouping
/// root; after the rewrite passes it has exactly one child, the top-level expression.
///
/// ## Parameters
/// - `expression`: raw expression text.
/// - `fragments`: grammar fragments the driver may dispatch to (see
///   `crate::grammar::default_fragments`).
/// - `track_positions`: stamp nodes with source spans and attach skipped whitespace.
///
/// ## Errors
/// Returns a [`ParseError`] for empty input, tokenization failures, unknown function
/// or modifier names, unbalanced nesting, unknown node kinds, dangling modifiers, and
/// malformed operator runs. See `crate::diagnostics` for the error taxonomy.
#[tracing::instrument(skip_all, fields(expression_len = expression.len(), track = track_positions))]
pub fn parse(expression: &str, fragments: Vec<Fragment>, track_positions: bool) -> Result<Node, ParseError> {
    TreeBuilder::new(fragments).with_tracking(track_positions).parse(expression)
}
