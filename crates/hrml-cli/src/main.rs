use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use hrml_parser::Document;
use hrml_query::Session;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hrml")]
#[command(about = "HRML — attribute markup parser and path query tool")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a batch: `n q` header, n markup lines, q queries
    Run {
        /// Batch input file (defaults to stdin)
        input: Option<PathBuf>,
    },

    /// Check a markup file for errors
    Check {
        /// Markup file
        path: PathBuf,
    },

    /// Answer queries such as `tag1.tag2~name` against a markup file
    Query {
        /// Markup file
        path: PathBuf,

        /// One or more queries
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Print the element tree of a markup file
    Tree {
        /// Markup file
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Run { input } => cmd_run(input.as_deref()),
        Command::Check { path } => cmd_check(&path),
        Command::Query { path, queries } => cmd_query(&path, &queries),
        Command::Tree { path } => cmd_tree(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn read_document(path: &Path) -> Result<Document> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    hrml_parser::Parser::parse(&source)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn cmd_run(input: Option<&Path>) -> Result<()> {
    let stdout = io::stdout();
    let answered = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Session::run_to(BufReader::new(file), stdout.lock())
        }
        None => Session::run_to(io::stdin().lock(), stdout.lock()),
    }
    .context("batch failed")?;

    tracing::debug!(answered, "batch complete");
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let doc = read_document(path)?;
    let elements = doc.descendants(doc.root()).count();
    eprintln!("OK: {} ({elements} elements)", path.display());
    Ok(())
}

fn cmd_query(path: &Path, queries: &[String]) -> Result<()> {
    let doc = read_document(path)?;
    let mut out = io::stdout().lock();
    for query in queries {
        writeln!(out, "{}", hrml_query::answer(&doc, query))?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_tree(path: &Path) -> Result<()> {
    let doc = read_document(path)?;
    let mut out = io::stdout().lock();

    writeln!(out, "{}", Document::ROOT_NAME)?;
    for (depth, id) in doc.descendants(doc.root()) {
        let element = doc.element(id);
        write!(out, "{:indent$}{}", "", element.name, indent = depth * 2)?;
        for (name, value) in &element.attributes {
            write!(out, " {name}=\"{value}\"")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
