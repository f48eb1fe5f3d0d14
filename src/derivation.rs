use crate::adjacency::Adjacency;
use crate::attribute_resolver::{self, multivalued_table};
use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
use crate::diagram_ast::Diagram;
use crate::isa_resolver;
use crate::relationship_resolver;
use crate::schema_ast::{Column, ResolvedTable, Schema, TableKind, TableMap};
use crate::weak_resolver;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveOptions {
    pub max_propagation_passes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

impl Derivation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }
}

pub fn derive(diagram: &Diagram) -> Derivation {
    derive_with_options(diagram, &DeriveOptions::default())
}

pub fn derive_with_options(diagram: &Diagram, options: &DeriveOptions) -> Derivation {
    let mut diagnostics = Diagnostics::new();
    let index = Adjacency::build(diagram, &mut diagnostics);

    let mut tables = TableMap::new();
    let mut derived = Vec::new();
    let mut pending_multivalued = Vec::new();
    for entity in index.nodes().filter(|n| n.is_entity()) {
        let attributes = attribute_resolver::resolve(&index, entity, &mut diagnostics);
        let mut table = ResolvedTable::new(entity.name.clone(), TableKind::Entity);
        for key in &attributes.primary_keys {
            table.push(Column::key(key.as_str()));
        }
        for name in &attributes.ordinary {
            table.push(Column::attribute(name.as_str()));
        }
        tables.insert(&entity.id, table);
        pending_multivalued.push((entity, attributes.multivalued));
    }

    let links = weak_resolver::ownerships(&index);
    let hierarchies = isa_resolver::hierarchies(&index, &mut diagnostics);
    let cap = options
        .max_propagation_passes
        .unwrap_or(index.node_count() + 1)
        .max(1);
    let mut passes = 0;
    loop {
        if passes == cap {
            diagnostics.push(Diagnostic::PropagationLimit { passes });
            break;
        }
        passes += 1;
        let added = weak_resolver::propagate_pass(&links, &mut tables)
            + isa_resolver::propagate_pass(&hierarchies, &mut tables);
        tracing::debug!(pass = passes, added, "key propagation pass");
        if added == 0 {
            break;
        }
    }

    for (entity, multivalued) in pending_multivalued {
        let Some(table) = tables.get(&entity.id) else {
            continue;
        };
        if table.primary_key().next().is_none() {
            diagnostics.push(Diagnostic::MissingPrimaryKey {
                entity: entity.name.clone(),
            });
        }
        for attribute in &multivalued {
            derived.push(multivalued_table(table, attribute));
        }
    }

    derived.extend(relationship_resolver::resolve_all(
        &index,
        &mut tables,
        &mut diagnostics,
    ));

    let mut schema = Schema {
        tables: tables.into_tables(),
    };
    schema.tables.extend(derived);
    for table in &schema.tables {
        tracing::debug!(table = %table.name, columns = table.columns.len(), "resolved table");
    }

    Derivation {
        schema,
        diagnostics: diagnostics.into_vec(),
    }
}
