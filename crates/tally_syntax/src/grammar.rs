//! Default fragment set: the stock Tally functions and modifiers.
//!
//! Functions parse parenthesized, comma-separated expression arguments (arity checked
//! where it is fixed). Modifiers parse the typed argument their meaning calls for: an
//! identifier for `aggregationType`, an integer offset for `periodOffset`, a date for
//! `minDate`/`maxDate`, and nothing for `yearToDate`.

use crate::ast::NodeKind;
use crate::fragment::Fragment;
use crate::parser::TreeBuilder;
use crate::scanner::Scanner;

/// Argument shape of a modifier fragment.
#[derive(Debug, Clone, Copy)]
enum ModifierArgs {
    None,
    Identifier,
    Integer,
    Date,
}

/// Build the stock fragment set.
pub fn default_fragments() -> Vec<Fragment> {
    vec![
        // General functions
        function("firstNonNull", 1, None),
        function("greatest", 1, None),
        function("if", 3, Some(3)),
        function("isNotNull", 1, Some(1)),
        function("isNull", 1, Some(1)),
        function("least", 1, None),
        function("log", 1, Some(1)),
        function("log10", 1, Some(1)),
        function("removeZeros", 1, Some(1)),
        // Aggregate functions
        function("avg", 1, Some(1)),
        function("count", 1, Some(1)),
        function("max", 1, Some(1)),
        function("median", 1, Some(1)),
        function("min", 1, Some(1)),
        function("percentileCont", 2, Some(2)),
        function("stddev", 1, Some(1)),
        function("sum", 1, Some(1)),
        function("variance", 1, Some(1)),
        // Modifiers
        modifier("aggregationType", ModifierArgs::Identifier),
        modifier("maxDate", ModifierArgs::Date),
        modifier("minDate", ModifierArgs::Date),
        modifier("periodOffset", ModifierArgs::Integer),
        modifier("yearToDate", ModifierArgs::None),
    ]
}

/// Fragment for a function call with `min`..=`max` expression arguments
/// (`max == None` means unbounded).
pub fn function(name: &'static str, min: usize, max: Option<usize>) -> Fragment {
    Fragment::new(name, move |scanner: &mut Scanner<'_>, builder: &mut TreeBuilder| {
        let start = scanner.fragment_start();
        builder.begin_node(NodeKind::FunctionCall, start, name, None)?;
        scanner.function_arguments(builder, name, min, max)?;
        builder.end_node(NodeKind::FunctionCall, scanner.pos())
    })
}

fn modifier(name: &'static str, args: ModifierArgs) -> Fragment {
    Fragment::new(name, move |scanner: &mut Scanner<'_>, builder: &mut TreeBuilder| {
        let start = scanner.fragment_start();
        builder.begin_node(NodeKind::Modifier, start, name, None)?;
        match args {
            ModifierArgs::None => scanner.no_arguments()?,
            ModifierArgs::Identifier => scanner.identifier_argument(builder)?,
            ModifierArgs::Integer => scanner.integer_argument(builder)?,
            ModifierArgs::Date => scanner.date_argument(builder)?,
        }
        builder.end_node(NodeKind::Modifier, scanner.pos())
    })
}

/// Fragment for a modifier that takes no arguments (an empty argument list is
/// accepted but not required). Exposed so callers can register their own bare
/// modifiers next to [`default_fragments`].
pub fn bare_modifier(name: &'static str) -> Fragment {
    modifier(name, ModifierArgs::None)
}
