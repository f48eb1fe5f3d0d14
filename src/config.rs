use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::derivation::DeriveOptions;
use crate::error::{Error, Result};

pub const DEFAULT_COLUMN_TYPE: &str = "VARCHAR(255)";
pub const DEFAULT_SCHEMA_HEADING: &str = "Relational schema:";
pub const DEFAULT_JUNCTION_HEADING: &str = "Junction tables:";
pub const DEFAULT_SQL_HEADER: &str = "-- Generated SQL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub column_type: String,
    pub schema_heading: String,
    pub junction_heading: String,
    pub sql_header: String,
    pub max_propagation_passes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            column_type: DEFAULT_COLUMN_TYPE.to_string(),
            schema_heading: DEFAULT_SCHEMA_HEADING.to_string(),
            junction_heading: DEFAULT_JUNCTION_HEADING.to_string(),
            sql_header: DEFAULT_SQL_HEADER.to_string(),
            max_propagation_passes: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            max_propagation_passes: self.max_propagation_passes,
        }
    }
}
