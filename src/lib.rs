pub mod adjacency;
pub mod attribute_resolver;
pub mod config;
pub mod derivation;
pub mod diagnostics;
pub mod diagram_ast;
pub mod diagram_io;
pub mod display_width;
pub mod error;
pub mod isa_resolver;
pub mod notation;
pub mod relationship_resolver;
pub mod schema_ast;
pub mod schema_renderer;
pub mod sql_emitter;
pub mod text_renderer;
pub mod weak_resolver;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use config::Config;
pub use derivation::{Derivation, DeriveOptions, derive, derive_with_options};
pub use diagram_io::DiagramDocument;
pub use error::{Error, Result};

use diagnostics::DiagnosticRecord;
use schema_ast::ResolvedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Annotated listing as an HTML fragment
    #[default]
    Html,
    /// Boxed tables for the terminal
    Text,
    /// `CREATE TABLE` statements
    Sql,
    /// Tables and diagnostics for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            "sql" => Ok(OutputFormat::Sql),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {s}. Valid options: html, text, sql, json"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Sql => write!(f, "sql"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    tables: &'a [ResolvedTable],
    diagnostics: Vec<DiagnosticRecord>,
}

pub fn render(input: &str, format: OutputFormat) -> Result<String> {
    render_with_config(input, format, &Config::default())
}

pub fn render_with_config(input: &str, format: OutputFormat, config: &Config) -> Result<String> {
    let document = DiagramDocument::from_json(input)?;
    let derivation = derive_with_options(&document.to_diagram(), &config.derive_options());
    render_derivation(&derivation, format, config)
}

pub fn render_derivation(derivation: &Derivation, format: OutputFormat, config: &Config) -> Result<String> {
    let schema = &derivation.schema;
    match format {
        OutputFormat::Html => Ok(schema_renderer::render(schema, config)),
        OutputFormat::Text => Ok(text_renderer::render(schema)),
        OutputFormat::Sql => Ok(sql_emitter::emit(schema, config)),
        OutputFormat::Json => {
            let output = JsonOutput {
                tables: &schema.tables,
                diagnostics: derivation.diagnostics.iter().map(DiagnosticRecord::from).collect(),
            };
            serde_json::to_string_pretty(&output).map_err(Error::Output)
        }
    }
}
