use crate::adjacency::Adjacency;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::diagram_ast::{Node, NodeKind};
use crate::schema_ast::{Column, TableMap};

#[derive(Debug, Clone)]
pub struct Hierarchy<'d> {
    pub isa: &'d Node,
    pub superclass: &'d Node,
    pub subclasses: Vec<&'d Node>,
}

pub fn hierarchies<'d>(index: &Adjacency<'d>, diagnostics: &mut Diagnostics) -> Vec<Hierarchy<'d>> {
    let mut found = Vec::new();
    for isa in index.nodes().filter(|n| n.kind == NodeKind::Isa) {
        let mut entities: Vec<&'d Node> = Vec::new();
        for neighbor in index.entity_neighbors(&isa.id) {
            if !entities.iter().any(|e| e.id == neighbor.node.id) {
                entities.push(neighbor.node);
            }
        }
        let Some(top) = select_superclass(&entities) else {
            diagnostics.push(Diagnostic::UnresolvableHierarchy {
                isa: isa.name.clone(),
                entities: entities.len(),
            });
            continue;
        };
        let superclass = entities.remove(top);
        tracing::debug!(
            superclass = %superclass.name,
            subclasses = entities.len(),
            "resolved ISA hierarchy"
        );
        found.push(Hierarchy {
            isa,
            superclass,
            subclasses: entities,
        });
    }
    found
}

/// The entity drawn highest on the canvas, first connected on ties.
pub fn select_superclass(entities: &[&Node]) -> Option<usize> {
    if entities.len() < 2 {
        return None;
    }
    entities
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.position.y.total_cmp(&b.position.y))
        .map(|(i, _)| i)
}

pub fn propagate_pass(hierarchies: &[Hierarchy<'_>], tables: &mut TableMap) -> usize {
    let mut added = 0;
    for hierarchy in hierarchies {
        let keys = tables.full_key(&hierarchy.superclass.id);
        for subclass in &hierarchy.subclasses {
            let Some(table) = tables.get_mut(&subclass.id) else {
                continue;
            };
            for key in &keys {
                match table.column_mut(&key.name) {
                    Some(existing) if existing.is_pk || existing.is_fk => {}
                    Some(existing) => {
                        existing.is_pk = true;
                        existing.is_fk = true;
                        existing.source_table = Some(hierarchy.superclass.name.clone());
                        added += 1;
                    }
                    None => {
                        table.push(Column::inherited_key(
                            key.name.clone(),
                            hierarchy.superclass.name.clone(),
                        ));
                        added += 1;
                    }
                }
            }
        }
    }
    added
}
