//! CLI for the Tally syntax frontend.
//!
//! Parses one expression (argument or stdin) and prints the resulting tree, or a
//! rich diagnostic report on failure.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. Only the top-level
//! [`run`] function prints to stderr and exits; everything else returns `Result`.

use std::io::Read;
use std::process;

use clap::Parser;

use tally_syntax::diagnostics::ErrorCategory;
use tally_syntax::{grammar, parser};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse Tally expressions and print their syntax tree
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version = VERSION)]
#[command(about = "Parse Tally expressions and print their syntax tree", long_about = None)]
pub struct Cli {
    /// Expression to parse; read from stdin when omitted
    pub expression: Option<String>,

    /// Track source positions and whitespace (spans are shown in the tree listing)
    #[arg(long)]
    pub positions: bool,
}

/// CLI entry point: parses arguments, runs the parse, prints the outcome, exits.
pub fn run() {
    let cli = Cli::parse();

    let expression = match cli.expression {
        Some(expression) => expression,
        None => {
            let mut buffer = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("error: failed to read expression from stdin: {err}");
                process::exit(2);
            }
            buffer.trim_end_matches(['\n', '\r']).to_string()
        }
    };

    tracing::debug!(len = expression.len(), positions = cli.positions, "parsing expression");
    match parser::parse(&expression, grammar::default_fragments(), cli.positions) {
        Ok(root) => print!("{}", root.to_tree_string()),
        Err(err) => {
            // Structural/configuration failures are bugs, not bad input; make that
            // visible before the rendered diagnostic.
            if err.category() != ErrorCategory::IllegalExpression {
                eprintln!("internal error ({:?})", err.category());
            }
            let report = miette::Report::new(err).with_source_code(expression);
            eprintln!("{report:?}");
            process::exit(1);
        }
    }
}
