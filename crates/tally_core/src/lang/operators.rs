//! Operator vocabulary.
//!
//! This module defines the canonical operator set (symbol operators like `+` and word
//! operators like `and`) along with the metadata the regrouping pass needs: precedence,
//! associativity, and fixity. The table is plain data so callers that want a different
//! precedence scheme can supply their own `&[OperatorInfo]` instead of [`OPERATORS`].
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and keyed by fixity, because `+` and
//!   `-` exist both as infix and as prefix operators.
//! - Some operators have a reserved-word spelling next to the symbol one (e.g. `&&` and
//!   `and`). Those entries carry both spellings and resolve to the same id.
//! - Every prefix operator binds tighter than every infix operator.
//!
//! ## Examples
//! ```rust
//! use tally_core::lang::operators::{self, Fixity, OperatorId};
//!
//! assert_eq!(operators::from_str("and", Fixity::Infix), Some(OperatorId::And));
//! assert_eq!(operators::from_str("-", Fixity::Prefix), Some(OperatorId::Neg));
//! assert_eq!(operators::info_for(OperatorId::Pow).precedence, 80);
//! ```

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Define whether an operator is infix (binary) or prefix (unary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Pow,
    Mul,
    Div,
    Mod,
    Add,
    Sub,

    // Comparison
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,

    // Logic
    And,
    Or,

    // Prefix
    Pos,
    Neg,
    Not,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `spellings` may contain multiple accepted spellings for the same operator id
///   (symbol and word form).
/// - `precedence` is a relative ordering where higher binds tighter. The absolute scale
///   is an implementation detail, but must be consistent across one table.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spellings: &'static [&'static str],
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
}

/// Registry of all operators. Higher precedence binds tighter.
pub const OPERATORS: &[OperatorInfo] = &[
    // Prefix operators: tighter than every infix operator
    op(OperatorId::Pos, &["+"], 90, Associativity::Right, Fixity::Prefix),
    op(OperatorId::Neg, &["-"], 90, Associativity::Right, Fixity::Prefix),
    op(OperatorId::Not, &["!", "not"], 90, Associativity::Right, Fixity::Prefix),
    // Arithmetic
    op(OperatorId::Pow, &["^"], 80, Associativity::Right, Fixity::Infix),
    op(OperatorId::Mul, &["*"], 70, Associativity::Left, Fixity::Infix),
    op(OperatorId::Div, &["/"], 70, Associativity::Left, Fixity::Infix),
    op(OperatorId::Mod, &["%"], 70, Associativity::Left, Fixity::Infix),
    op(OperatorId::Add, &["+"], 60, Associativity::Left, Fixity::Infix),
    op(OperatorId::Sub, &["-"], 60, Associativity::Left, Fixity::Infix),
    // Comparison
    op(OperatorId::Lt, &["<"], 50, Associativity::Left, Fixity::Infix),
    op(OperatorId::LtEq, &["<="], 50, Associativity::Left, Fixity::Infix),
    op(OperatorId::Gt, &[">"], 50, Associativity::Left, Fixity::Infix),
    op(OperatorId::GtEq, &[">="], 50, Associativity::Left, Fixity::Infix),
    op(OperatorId::EqEq, &["=="], 40, Associativity::Left, Fixity::Infix),
    op(OperatorId::NotEq, &["!="], 40, Associativity::Left, Fixity::Infix),
    // Logic
    op(OperatorId::And, &["&&", "and"], 30, Associativity::Left, Fixity::Infix),
    op(OperatorId::Or, &["||", "or"], 20, Associativity::Left, Fixity::Infix),
];

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its identifier, for the given fixity.
///
/// ## Returns
/// - `Some(OperatorId)` if the spelling exists in [`OPERATORS`] with that fixity.
/// - `None` otherwise.
pub fn from_str(spelling: &str, fixity: Fixity) -> Option<OperatorId> {
    lookup(spelling, fixity).map(|o| o.id)
}

/// Resolve an operator spelling to its metadata entry in the default registry.
pub fn lookup(spelling: &str, fixity: Fixity) -> Option<&'static OperatorInfo> {
    lookup_in(OPERATORS, spelling, fixity)
}

/// Resolve an operator spelling against a caller-supplied table.
///
/// This is the lookup the regrouping pass uses, so a custom precedence table can be
/// injected without touching the default registry.
pub fn lookup_in<'a>(table: &'a [OperatorInfo], spelling: &str, fixity: Fixity) -> Option<&'a OperatorInfo> {
    table
        .iter()
        .find(|o| o.fixity == fixity && o.spellings.contains(&spelling))
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spellings: &'static [&'static str],
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spellings,
        precedence,
        associativity,
        fixity,
    }
}
