use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ersql::sql_emitter::DEFAULT_SQL_FILE_NAME;
use ersql::{Config, DiagramDocument, OutputFormat, derive_with_options, render_derivation, schema_renderer};

#[derive(Parser)]
#[command(name = "ersql", about = "Derive a relational schema and SQL DDL from a saved ER diagram")]
struct Cli {
    /// Diagram JSON file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Output format: html, text, sql, json
    #[arg(long, short = 'f', default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Write output to a file; with `sql`, a directory receives database.sql
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// SQL type given to every column
    #[arg(long)]
    column_type: Option<String>,

    /// Cap on key propagation passes
    #[arg(long)]
    max_passes: Option<usize>,

    /// Write a copy of the diagram with the schema listing embedded
    #[arg(long, value_name = "OUT.json")]
    embed: Option<PathBuf>,

    /// Log derivation steps to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ersql=debug" } else { "ersql=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(column_type) = cli.column_type {
        config.column_type = column_type;
    }
    if cli.max_passes.is_some() {
        config.max_propagation_passes = cli.max_passes;
    }

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let mut document = DiagramDocument::from_json(&input)?;
    let derivation = derive_with_options(&document.to_diagram(), &config.derive_options());
    tracing::info!(
        tables = derivation.schema.tables.len(),
        diagnostics = derivation.diagnostics.len(),
        "derived schema"
    );

    let output = render_derivation(&derivation, cli.format, &config)?;
    match &cli.output {
        Some(path) => {
            let target = output_path(path, cli.format);
            std::fs::write(&target, &output)
                .with_context(|| format!("failed to write {}", target.display()))?;
        }
        None => print!("{output}"),
    }

    if let Some(path) = &cli.embed {
        document.embed_schema(&schema_renderer::render(&derivation.schema, &config));
        std::fs::write(path, document.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn output_path(path: &Path, format: OutputFormat) -> PathBuf {
    if format == OutputFormat::Sql && path.is_dir() {
        path.join(DEFAULT_SQL_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
