mod input;

use crate::symbols::Operator;
use clap::{Parser, Subcommand, ValueEnum};
pub use input::{InputError, read_input};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parse, normalize and compare logical condition expressions
///
/// Expressions are JSON5 records whose keys are operator symbols (! && ||)
/// or field keys. Every EXPR argument also accepts @path to read a file and
/// - to read standard input.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON5 configuration file
    #[arg(long, global = true, env = "CONDITION_ENGINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(short = 'F', long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// When to colorize text output
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    /// Write the output to this file as well
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an expression and print its normalized condition tree
    Parse {
        /// Expression, @file or -
        expression: String,

        /// Operator joining the top-level fragments
        #[arg(long, value_enum)]
        operator: Option<OperatorArg>,

        /// Refuse expressions whose operands have the wrong shape
        #[arg(long)]
        strict: bool,
    },
    /// Normalize an already built condition tree ({"operator": ..., "elements": [...]})
    Normalize {
        /// Condition tree, @file or -
        tree: String,
    },
    /// Report operands whose shape does not match their operator or predicate
    Check {
        /// Expression, @file or -
        expression: String,
    },
    /// Tell whether two expressions normalize to the same condition
    Equiv {
        /// First expression, @file or -
        left: String,

        /// Second expression, @file or -
        right: String,

        /// Operator joining the top-level fragments of both expressions
        #[arg(long, value_enum)]
        operator: Option<OperatorArg>,
    },
    /// List the operator and predicate symbols
    Symbols,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable rendering
    Text,
    /// Condition tree as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Operator names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperatorArg {
    And,
    Or,
    Not,
}

impl From<OperatorArg> for Operator {
    fn from(arg: OperatorArg) -> Self {
        match arg {
            OperatorArg::And => Operator::And,
            OperatorArg::Or => Operator::Or,
            OperatorArg::Not => Operator::Not,
        }
    }
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
