use crate::config::Config;
use crate::schema_ast::{ResolvedTable, Schema};

pub const DEFAULT_SQL_FILE_NAME: &str = "database.sql";

const INDENT: &str = "    ";

pub fn emit(schema: &Schema, config: &Config) -> String {
    let mut sql = format!("{}\n\n", config.sql_header);
    for table in &schema.tables {
        sql.push_str(&create_table(table, &config.column_type));
        sql.push('\n');
    }
    sql
}

pub fn create_table(table: &ResolvedTable, column_type: &str) -> String {
    let mut lines: Vec<String> = table
        .display_order()
        .into_iter()
        .map(|c| format!("{INDENT}{} {column_type}", normalize_identifier(&c.name)))
        .collect();

    let keys: Vec<String> = table
        .primary_key()
        .map(|c| normalize_identifier(&c.name))
        .collect();
    if !keys.is_empty() {
        lines.push(format!("{INDENT}PRIMARY KEY ({})", keys.join(", ")));
    }

    for column in table.foreign_keys() {
        let name = normalize_identifier(&column.name);
        let target = column
            .source_table
            .as_deref()
            .map(normalize_identifier)
            .unwrap_or_default();
        lines.push(format!("{INDENT}FOREIGN KEY ({name}) REFERENCES {target}({name})"));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);\n",
        normalize_identifier(&table.name),
        lines.join(",\n")
    )
}

pub fn normalize_identifier(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
