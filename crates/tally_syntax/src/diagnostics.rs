//! Parse errors for the Tally syntax frontend.
//!
//! Errors fall into three categories (see [`ErrorCategory`]):
//! - *illegal expression*: problems in the input text itself; these are the errors a
//!   caller may want to show to an end user,
//! - *structural*: unbalanced or mismatched begin/end calls, which indicate a driver
//!   or grammar bug rather than bad input,
//! - *configuration*: a missing node factory, which indicates a setup bug.
//!
//! Nothing is swallowed or auto-corrected: a failed parse returns no tree at all, and
//! parsing the same input fails identically.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::ast::{NodeKind, Span};

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input text is not a legal expression.
    IllegalExpression,
    /// The begin/end call sequence was not well nested (driver bug).
    Structural,
    /// The parser was set up incorrectly (missing factory).
    Configuration,
}

/// Error raised while parsing an expression.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    // ========== Illegal expression (input) ==========
    #[error("empty expression")]
    #[diagnostic(code(tally::empty_expression))]
    EmptyExpression,

    #[error("syntax error: {message}")]
    #[diagnostic(code(tally::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        at: Option<SourceSpan>,
    },

    #[error("unknown function: {name}")]
    #[diagnostic(code(tally::unknown_function))]
    UnknownFunction {
        name: String,
        #[label("not a registered function")]
        at: Option<SourceSpan>,
    },

    #[error("unknown modifier: {name}")]
    #[diagnostic(code(tally::unknown_modifier))]
    UnknownModifier {
        name: String,
        #[label("not a registered modifier")]
        at: Option<SourceSpan>,
    },

    #[error("modifier '{name}' has nothing to qualify")]
    #[diagnostic(
        code(tally::dangling_modifier),
        help("a modifier must directly follow a data reference, variable, or function call")
    )]
    DanglingModifier {
        name: String,
        #[label("no preceding node to attach to")]
        at: Option<SourceSpan>,
    },

    #[error("malformed operator sequence: {message}")]
    #[diagnostic(code(tally::malformed_operators))]
    MalformedOperatorRun {
        message: String,
        #[label("here")]
        at: Option<SourceSpan>,
    },

    #[error("expression nesting exceeds {limit} levels")]
    #[diagnostic(code(tally::nesting_too_deep))]
    NestingTooDeep { limit: usize },

    // ========== Structural (driver bug) ==========
    #[error("unbalanced node nesting: {message}")]
    #[diagnostic(code(tally::unbalanced))]
    UnbalancedNesting { message: String },

    #[error("node kind mismatch: expected to close {expected}, but the open node is {found}")]
    #[diagnostic(code(tally::kind_mismatch))]
    KindMismatch { expected: NodeKind, found: NodeKind },

    // ========== Configuration (setup bug) ==========
    #[error("no factory registered for node kind {kind}")]
    #[diagnostic(code(tally::unsupported_kind))]
    UnsupportedKind { kind: NodeKind },
}

impl ParseError {
    /// Classify this error. Callers typically surface
    /// [`ErrorCategory::IllegalExpression`] to end users and treat the other two as
    /// internal bugs.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::EmptyExpression
            | ParseError::Syntax { .. }
            | ParseError::UnknownFunction { .. }
            | ParseError::UnknownModifier { .. }
            | ParseError::DanglingModifier { .. }
            | ParseError::MalformedOperatorRun { .. }
            | ParseError::NestingTooDeep { .. } => ErrorCategory::IllegalExpression,
            ParseError::UnbalancedNesting { .. } | ParseError::KindMismatch { .. } => ErrorCategory::Structural,
            ParseError::UnsupportedKind { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        ParseError::Syntax {
            message: message.into(),
            at: Some(to_source_span(span)),
        }
    }

    pub(crate) fn malformed_run(message: impl Into<String>, span: Option<Span>) -> Self {
        ParseError::MalformedOperatorRun {
            message: message.into(),
            at: span.map(to_source_span),
        }
    }

    pub(crate) fn dangling_modifier(name: impl Into<String>, span: Option<Span>) -> Self {
        ParseError::DanglingModifier {
            name: name.into(),
            at: span.map(to_source_span),
        }
    }
}

/// Convert a byte-offset [`Span`] into a miette [`SourceSpan`].
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.end.saturating_sub(span.start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(ParseError::EmptyExpression.category(), ErrorCategory::IllegalExpression);
        assert_eq!(
            ParseError::syntax("boom", Span::new(0, 1)).category(),
            ErrorCategory::IllegalExpression
        );
        assert_eq!(
            ParseError::UnbalancedNesting {
                message: "end with no node open".to_string()
            }
            .category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            ParseError::KindMismatch {
                expected: NodeKind::Integer,
                found: NodeKind::Boolean
            }
            .category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            ParseError::UnsupportedKind { kind: NodeKind::Date }.category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_source_span_conversion() {
        let span = to_source_span(Span::new(3, 7));
        assert_eq!(span.offset(), 3);
        assert_eq!(span.len(), 4);
    }
}
