use std::collections::{HashMap, HashSet, VecDeque};

use crate::adjacency::Adjacency;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::diagram_ast::{AttributeKind, Node, NodeKind};
use crate::schema_ast::{Column, ResolvedTable, TableKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAttributes {
    pub primary_keys: Vec<String>,
    pub ordinary: Vec<String>,
    pub multivalued: Vec<String>,
}

impl ResolvedAttributes {
    pub fn is_empty(&self) -> bool {
        self.primary_keys.is_empty() && self.ordinary.is_empty() && self.multivalued.is_empty()
    }
}

pub fn resolve<'d>(
    index: &Adjacency<'d>,
    owner: &'d Node,
    diagnostics: &mut Diagnostics,
) -> ResolvedAttributes {
    let mut resolved = ResolvedAttributes::default();
    let levels = levels(index, owner);
    let mut seen: HashSet<&'d str> = HashSet::new();
    let mut reported: HashSet<usize> = HashSet::new();

    // Children sit exactly one level below their parent; pushed in reverse so
    // leaves come out in connection order.
    let mut stack: Vec<(&'d Node, usize)> = children(index, &owner.id, 0, &levels)
        .into_iter()
        .rev()
        .map(|child| (child, 1))
        .collect();

    while let Some((attribute, level)) = stack.pop() {
        if !seen.insert(attribute.id.as_str()) {
            continue;
        }

        for sibling in index
            .neighbors(&attribute.id)
            .filter(|n| levels.get(n.node.id.as_str()) == Some(&level))
        {
            if reported.insert(sibling.edge) {
                diagnostics.push(Diagnostic::AttributeCycle {
                    owner: owner.name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
        }

        let nested = children(index, &attribute.id, level, &levels);
        if !nested.is_empty() {
            stack.extend(nested.into_iter().rev().map(|child| (child, level + 1)));
            continue;
        }

        if attribute.name.is_empty() {
            tracing::debug!(id = %attribute.id, "skipping attribute without a name");
            continue;
        }
        let name = attribute.name.clone();
        match attribute.kind {
            NodeKind::Attribute(AttributeKind::Multivalued) => resolved.multivalued.push(name),
            NodeKind::Attribute(AttributeKind::Derived) => {
                tracing::debug!(owner = %owner.name, attribute = %name, "derived attribute not stored");
            }
            _ if attribute.is_primary_key => resolved.primary_keys.push(name),
            _ => resolved.ordinary.push(name),
        }
    }

    resolved
}

pub fn multivalued_table(owner: &ResolvedTable, attribute: &str) -> ResolvedTable {
    let mut table = ResolvedTable::new(
        format!("{}_{}", owner.name, attribute),
        TableKind::Multivalued,
    );
    for key in owner.primary_key() {
        table.push(Column::inherited_key(key.name.clone(), owner.name.clone()));
    }
    let value = table.unique_name(attribute, "value");
    table.push(Column::key(value));
    table
}

fn levels<'d>(index: &Adjacency<'d>, owner: &'d Node) -> HashMap<&'d str, usize> {
    let mut levels = HashMap::from([(owner.id.as_str(), 0)]);
    let mut queue = VecDeque::from([(owner, 0)]);
    while let Some((node, level)) = queue.pop_front() {
        for next in index.neighbors(&node.id).map(|n| n.node) {
            if next.is_attribute() && !levels.contains_key(next.id.as_str()) {
                levels.insert(next.id.as_str(), level + 1);
                queue.push_back((next, level + 1));
            }
        }
    }
    levels
}

fn children<'d>(
    index: &Adjacency<'d>,
    id: &str,
    level: usize,
    levels: &HashMap<&'d str, usize>,
) -> Vec<&'d Node> {
    index
        .neighbors(id)
        .map(|n| n.node)
        .filter(|n| n.is_attribute() && levels.get(n.id.as_str()) == Some(&(level + 1)))
        .collect()
}
