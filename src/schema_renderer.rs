use crate::config::Config;
use crate::schema_ast::{Column, ResolvedTable, Schema};

pub fn render(schema: &Schema, config: &Config) -> String {
    let mut html = format!("<b>{}</b><br><br>", escape(&config.schema_heading));
    for table in schema.base_tables() {
        html.push_str(&render_table(table));
    }

    let mut derived = schema.derived_tables().peekable();
    if derived.peek().is_some() {
        html.push_str(&format!("<br><i>{}</i><br>", escape(&config.junction_heading)));
        for table in derived {
            html.push_str(&render_table(table));
        }
    }
    html
}

pub fn render_table(table: &ResolvedTable) -> String {
    let columns: Vec<String> = table.display_order().into_iter().map(render_column).collect();
    format!("<b>{}</b> ( {} )<br>", escape(&table.name), columns.join(", "))
}

fn render_column(column: &Column) -> String {
    let name = escape(&column.name);
    match (column.is_pk, column.is_fk) {
        (true, true) => format!("<ins><i>{name}</i></ins>"),
        (true, false) => format!("<ins>{name}</ins>"),
        (false, true) => format!("<i>{name}</i>"),
        (false, false) => name,
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
