pub mod cli;
pub mod condition;
pub mod config;
pub mod errors;
pub mod guards;
pub mod normalizer;
pub mod parser;
pub mod processor;
pub mod symbols;

use crate::config::EngineConfig;
use crate::guards::{ShapeViolation, check_shapes};
use anyhow::{Context, bail};
use colored::Colorize;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use serde_json::{Value, json};
use similar::{ChangeTag, TextDiff};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use condition::{Condition, ConditionElement, PredicateSet};
pub use errors::{ConditionError, DuplicateSymbolError, ParseTextError};
pub use normalizer::{normalize, normalize_element, normalize_nested, normalize_with_siblings};
pub use parser::{parse, parse_condition, parse_str};
pub use processor::{
    ConditionProcessor, ConditionWalker, DefaultConditionProcessor, DefaultConditionWalker,
    DisplayProcessor,
};
pub use symbols::{Operator, Predicate};

/// Install the stderr log subscriber; `RUST_LOG` wins over the verbosity flags
pub fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("condition_engine={level}")));

    // A subscriber may already be installed when embedded in another binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Settings of one invocation, flags taking precedence over the config file
#[derive(Debug, Clone, Copy)]
struct Settings {
    default_operator: Operator,
    format: OutputFormat,
    pretty: bool,
    strict: bool,
    colored: bool,
}

impl Settings {
    fn resolve(cli: &cli::Cli, config: &EngineConfig) -> Self {
        let color = cli.color.unwrap_or(config.color);
        let colored = match color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        };
        colored::control::set_override(colored);

        Self {
            default_operator: config.default_operator,
            format: cli.format.unwrap_or(config.format),
            pretty: config.pretty,
            strict: config.strict,
            colored,
        }
    }
}

/// Result of a subcommand, rendered once for stdout and once for `--output`
enum Report {
    Tree(ConditionElement),
    Violations(Vec<ShapeViolation>),
    Equivalence {
        left: ConditionElement,
        right: ConditionElement,
    },
    Symbols,
}

impl Report {
    fn exit_code(&self) -> ExitCode {
        let failed = match self {
            Report::Violations(violations) => !violations.is_empty(),
            Report::Equivalence { left, right } => left != right,
            Report::Tree(_) | Report::Symbols => false,
        };
        if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    fn render(&self, settings: &Settings, colored: bool) -> anyhow::Result<String> {
        let text = match (self, settings.format) {
            (Report::Tree(tree), OutputFormat::Text) => {
                format!("{}\n", DisplayProcessor::new().colored(colored).render(tree))
            }
            (Report::Tree(tree), OutputFormat::Json) => to_json(tree, settings.pretty)?,
            (Report::Violations(violations), OutputFormat::Text) => {
                render_violations(violations, colored)
            }
            (Report::Violations(violations), OutputFormat::Json) => {
                let entries: Vec<Value> = violations
                    .iter()
                    .map(|violation| {
                        json!({
                            "path": violation.path,
                            "symbol": violation.symbol,
                            "kind": violation.kind.to_string(),
                            "expected": violation.expected,
                            "found": violation.found,
                        })
                    })
                    .collect();
                to_json(&entries, settings.pretty)?
            }
            (Report::Equivalence { left, right }, OutputFormat::Text) => {
                render_equivalence(left, right, colored)?
            }
            (Report::Equivalence { left, right }, OutputFormat::Json) => to_json(
                &json!({ "equivalent": left == right, "left": left, "right": right }),
                settings.pretty,
            )?,
            (Report::Symbols, OutputFormat::Text) => format!("{}\n", symbols_table()),
            (Report::Symbols, OutputFormat::Json) => {
                to_json(&symbols_listing(), settings.pretty)?
            }
        };
        Ok(text)
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    text.push('\n');
    Ok(text)
}

fn render_violations(violations: &[ShapeViolation], colored: bool) -> String {
    if violations.is_empty() {
        let message = "No shape violations found";
        return if colored {
            format!("{}\n", message.green())
        } else {
            format!("{message}\n")
        };
    }

    let mut text = String::new();
    for violation in violations {
        let line = violation.to_string();
        if colored {
            text.push_str(&line.red().to_string());
        } else {
            text.push_str(&line);
        }
        text.push('\n');
    }
    text.push_str(&format!("{} shape violation(s)\n", violations.len()));
    text
}

fn render_equivalence(
    left: &ConditionElement,
    right: &ConditionElement,
    colored: bool,
) -> anyhow::Result<String> {
    if left == right {
        return Ok("Expressions are equivalent\n".to_string());
    }

    let left_json = to_json(left, true)?;
    let right_json = to_json(right, true)?;
    let mut text = String::from("Expressions differ\n");
    let diff = TextDiff::from_lines(&left_json, &right_json);
    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{change}"),
            ChangeTag::Insert => format!("+{change}"),
            ChangeTag::Equal => format!(" {change}"),
        };
        match change.tag() {
            ChangeTag::Delete if colored => text.push_str(&line.red().to_string()),
            ChangeTag::Insert if colored => text.push_str(&line.green().to_string()),
            _ => text.push_str(&line),
        }
    }
    Ok(text)
}

fn symbols_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Kind", "Name", "Canonical", "Synonyms"]);

    let operators = Operator::ALL
        .iter()
        .map(|operator| ("operator", operator.name(), operator.symbols()));
    let predicates = Predicate::ALL
        .iter()
        .map(|predicate| ("predicate", predicate.name(), predicate.symbols()));
    for (kind, name, symbols) in operators.chain(predicates) {
        let canonical = symbols.first().copied().unwrap_or_default();
        let synonyms = symbols.get(1..).unwrap_or_default();
        table.add_row(vec![
            Cell::new(kind),
            Cell::new(name),
            Cell::new(canonical),
            Cell::new(synonyms.join(" ")),
        ]);
    }
    table
}

fn symbols_listing() -> Value {
    let entry = |kind: &str, name: &str, symbols: &[&str]| {
        json!({ "kind": kind, "name": name, "symbols": symbols })
    };
    let operators = Operator::ALL
        .iter()
        .map(|operator| entry("operator", operator.name(), operator.symbols()));
    let predicates = Predicate::ALL
        .iter()
        .map(|predicate| entry("predicate", predicate.name(), predicate.symbols()));
    Value::Array(operators.chain(predicates).collect())
}

fn read_expression(argument: &str) -> anyhow::Result<Value> {
    let text = cli::read_input(argument)?;
    json5::from_str(&text).with_context(|| format!("Invalid expression syntax in '{argument}'"))
}

fn parse_expression(
    argument: &str,
    operator: Operator,
    strict: bool,
) -> anyhow::Result<ConditionElement> {
    let expression = read_expression(argument)?;

    let violations = check_shapes(&expression);
    if !violations.is_empty() {
        let listing: Vec<String> = violations.iter().map(ToString::to_string).collect();
        if strict {
            bail!(
                "Expression has {} shape violation(s):\n  {}",
                violations.len(),
                listing.join("\n  ")
            );
        }
        for line in &listing {
            warn!("{line}");
        }
    }

    Ok(parse(&expression, operator)?)
}

fn execute(command: &Commands, settings: &Settings) -> anyhow::Result<Report> {
    let report = match command {
        Commands::Parse {
            expression,
            operator,
            strict,
        } => {
            let operator = operator.map(Operator::from).unwrap_or(settings.default_operator);
            info!(%operator, "parsing expression");
            Report::Tree(parse_expression(expression, operator, *strict || settings.strict)?)
        }
        Commands::Normalize { tree } => {
            let raw = read_expression(tree)?;
            let element: ConditionElement =
                serde_json::from_value(raw).context("Invalid condition tree")?;
            info!(depth = element.as_condition().map_or(0, Condition::depth), "normalizing tree");
            Report::Tree(normalize_element(&element))
        }
        Commands::Check { expression } => {
            let violations = check_shapes(&read_expression(expression)?);
            info!(count = violations.len(), "checked expression shapes");
            Report::Violations(violations)
        }
        Commands::Equiv {
            left,
            right,
            operator,
        } => {
            let operator = operator.map(Operator::from).unwrap_or(settings.default_operator);
            Report::Equivalence {
                left: parse_expression(left, operator, settings.strict)?,
                right: parse_expression(right, operator, settings.strict)?,
            }
        }
        Commands::Symbols => Report::Symbols,
    };
    Ok(report)
}

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = cli_parse();
    init_tracing(cli.verbose, cli.quiet);
    symbols::init();

    let config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    let settings = Settings::resolve(&cli, &config);
    if let Some(config_path) = &cli.config {
        info!(path = %config_path.display(), "loaded config");
    }

    let report = execute(&cli.command, &settings)?;
    print!("{}", report.render(&settings, settings.colored)?);
    if let Some(path) = &cli.output {
        write_output_file(path, &report.render(&settings, false)?)?;
    }

    Ok(report.exit_code())
}
