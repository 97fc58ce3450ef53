//! `pathdig` CLI -- resolve nested paths and select records from JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve a path (stdin → stdout)
//! echo '{"user":{"name":"Alice"}}' | pathdig get user.name
//!
//! # Resolve from a file, with a fallback value
//! pathdig get -i family.json 0.children.1.typo --default '"Not Found"'
//!
//! # Narrow the root list before indexing into it
//! pathdig get -i family.json 0.children.1.name --filter '0:name=John Alone'
//!
//! # Keep the records under `users` whose age is at least 21
//! pathdig select -i profiles.json --path users --where 'user.profile.age>=21'
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pathdig_core::{filter_entries, LevelFilters, PathFilter, Predicate, Resolver, Separator};
use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pathdig",
    version,
    about = "Nested path lookups over JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log resolution steps to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a path and print the value found there
    Get {
        /// Path to resolve, e.g. `0.children.1.name` (empty for the whole document)
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Path separator
        #[arg(long, default_value = ".")]
        separator: String,
        /// Value printed when the path cannot be walked (JSON, or a bare string)
        #[arg(long)]
        default: Option<String>,
        /// Level filter as `LEVEL:EXPR`, e.g. `0:name=John Alone` (repeatable)
        #[arg(long = "filter", value_name = "LEVEL:EXPR")]
        filters: Vec<String>,
    },
    /// Keep the entries of a collection matching every condition
    Select {
        /// Path to the collection (the document root if omitted)
        #[arg(long, default_value = "")]
        path: String,
        /// Condition as `PATH OP VALUE`, e.g. `user.profile.age>=21` (repeatable)
        #[arg(long = "where", value_name = "EXPR", required = true)]
        conditions: Vec<String>,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Path separator, shared by the collection path and the conditions
        #[arg(long, default_value = ".")]
        separator: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Get {
            path,
            input,
            output,
            separator,
            default,
            filters,
        } => {
            let separator = Separator::new(separator).context("Invalid --separator")?;
            let document = read_document(input.as_deref())?;
            let filters = build_level_filters(&filters, &separator)?;
            debug!(levels = filters.len(), path = %path, "resolving path");

            let mut resolver = Resolver::new()
                .with_separator(separator)
                .with_filters(filters);
            if let Some(raw) = default.as_deref() {
                resolver = resolver.with_default(parse_value(raw));
            }

            let value = resolver.resolve(&document, &path);
            write_output(output.as_deref(), &to_pretty(&value)?)?;
        }
        Commands::Select {
            path,
            conditions,
            input,
            output,
            separator,
        } => {
            let separator = Separator::new(separator).context("Invalid --separator")?;
            let document = read_document(input.as_deref())?;
            let conditions = build_conditions(&conditions, &separator)?;
            debug!(conditions = conditions.len(), path = %path, "selecting entries");

            let collection = Resolver::new()
                .with_separator(separator)
                .resolve(&document, &path);
            let matches_all = move |entry: &Value| conditions.iter().all(|c| c.test(entry));
            let selected = filter_entries(&collection, &matches_all);

            write_output(output.as_deref(), &to_pretty(&selected)?)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "pathdig_core=trace,pathdig=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Build level filters from `LEVEL:EXPR` arguments.
///
/// - `0:name=John Alone` filters the root container on `name`
/// - `2:id>=3` filters the container reached after two segments
fn build_level_filters(raw: &[String], separator: &Separator) -> Result<LevelFilters> {
    let mut filters = LevelFilters::new();

    for arg in raw {
        let (level, expr) = arg
            .split_once(':')
            .with_context(|| format!("Filter '{}' must look like LEVEL:EXPR", arg))?;
        let level: usize = level
            .trim()
            .parse()
            .with_context(|| format!("Invalid level in filter '{}'", arg))?;
        let filter = PathFilter::parse(expr)
            .with_context(|| format!("Invalid filter '{}'", arg))?
            .with_separator(separator.clone());
        filters.insert(level, filter);
    }

    Ok(filters)
}

fn build_conditions(raw: &[String], separator: &Separator) -> Result<Vec<PathFilter>> {
    raw.iter()
        .map(|expr| {
            PathFilter::parse(expr)
                .map(|f| f.with_separator(separator.clone()))
                .with_context(|| format!("Invalid condition '{}'", expr))
        })
        .collect()
}

/// Read a flag value as JSON, falling back to a bare string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn to_pretty(value: &Value) -> Result<String> {
    let mut pretty = serde_json::to_string_pretty(value)?;
    pretty.push('\n');
    Ok(pretty)
}

fn read_document(path: Option<&str>) -> Result<Value> {
    let raw = match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Input is not valid JSON")
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
