use crate::display_width::{max_width, pad_right};
use crate::schema_ast::{Column, ResolvedTable, Schema, TableKind};

pub fn render(schema: &Schema) -> String {
    schema
        .tables
        .iter()
        .map(render_table)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_table(table: &ResolvedTable) -> String {
    let title = match table.kind {
        TableKind::Entity => table.name.clone(),
        TableKind::Junction => format!("{} (junction)", table.name),
        TableKind::Multivalued => format!("{} (multivalued)", table.name),
    };
    let rows: Vec<String> = table.display_order().into_iter().map(column_row).collect();
    let inner = max_width(rows.iter().map(String::as_str).chain([title.as_str()]));
    let rule = "─".repeat(inner + 2);

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(format!("┌{rule}┐"));
    lines.push(format!("│ {} │", pad_right(&title, inner)));
    if !rows.is_empty() {
        lines.push(format!("├{rule}┤"));
        for row in &rows {
            lines.push(format!("│ {} │", pad_right(row, inner)));
        }
    }
    lines.push(format!("└{rule}┘"));
    lines.join("\n")
}

fn column_row(column: &Column) -> String {
    let marker = match (column.is_pk, column.is_fk) {
        (true, true) => "PK FK",
        (true, false) => "PK   ",
        (false, true) => "   FK",
        (false, false) => "     ",
    };
    match &column.source_table {
        Some(source) if column.is_fk => format!("{marker} {} → {source}", column.name),
        _ => format!("{marker} {}", column.name),
    }
}
