use std::collections::HashMap;

use crate::adjacency::{Adjacency, Neighbor};
use crate::attribute_resolver::{self, ResolvedAttributes, multivalued_table};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::diagram_ast::Node;
use crate::notation::Cardinality;
use crate::schema_ast::{Column, ResolvedTable, TableKind, TableMap};
use crate::weak_resolver::{self, Ownership};

pub const OTHER_ROLE_PREFIX: &str = "other_";
pub const SUPERVISOR_PREFIX: &str = "supervisor_";
pub const SPOUSE_PREFIX: &str = "spouse_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    ManyToMany,
    OneToMany { many: Side },
    OneToOne,
}

pub fn classify(first: &Cardinality, second: &Cardinality) -> Shape {
    match (first.is_many(), second.is_many()) {
        (true, true) => Shape::ManyToMany,
        (true, false) => Shape::OneToMany { many: Side::First },
        (false, true) => Shape::OneToMany { many: Side::Second },
        (false, false) => Shape::OneToOne,
    }
}

/// The first participant in connection order takes the foreign key.
pub fn one_to_one_holder<'a, 'd>(
    first: &'a Neighbor<'d>,
    second: &'a Neighbor<'d>,
) -> (&'a Neighbor<'d>, &'a Neighbor<'d>) {
    (first, second)
}

pub fn resolve_all(
    index: &Adjacency<'_>,
    tables: &mut TableMap,
    diagnostics: &mut Diagnostics,
) -> Vec<ResolvedTable> {
    let links = weak_resolver::ownerships(index);
    let mut derived = Vec::new();
    for relationship in index.nodes().filter(|n| n.is_relationship()) {
        resolve_one(index, relationship, &links, tables, &mut derived, diagnostics);
    }
    derived
}

fn resolve_one<'d>(
    index: &Adjacency<'d>,
    relationship: &'d Node,
    links: &[Ownership<'d>],
    tables: &mut TableMap,
    derived: &mut Vec<ResolvedTable>,
    diagnostics: &mut Diagnostics,
) {
    let participants = index.entity_neighbors(&relationship.id);
    let attributes = attribute_resolver::resolve(index, relationship, diagnostics);
    let nodes: Vec<&Node> = participants.iter().map(|p| p.node).collect();

    if weak_resolver::is_identifying(relationship, &nodes) {
        // Keys already flowed through the weak-entity resolver.
        let mut dependents: Vec<&Node> = Vec::new();
        for link in links.iter().filter(|l| l.relationship.id == relationship.id) {
            if !dependents.iter().any(|d| d.id == link.dependent.id) {
                dependents.push(link.dependent);
            }
        }
        if dependents.is_empty() {
            dependents = nodes.iter().copied().filter(|n| n.is_weak).collect();
        }
        for dependent in dependents {
            fold_attributes(tables, relationship, &attributes, dependent, derived);
        }
        return;
    }

    match participants.as_slice() {
        [] | [_] => diagnostics.push(Diagnostic::UnresolvableRelationship {
            relationship: relationship.name.clone(),
            participants: participants.len(),
        }),
        [first, second] => {
            let recursive = first.node.id == second.node.id;
            let shape = classify(first.card, second.card);
            tracing::debug!(
                relationship = %relationship.name,
                ?shape,
                recursive,
                "classified binary relationship"
            );
            match shape {
                Shape::ManyToMany => {
                    let table = junction_table(relationship, &attributes, &nodes, tables);
                    push_junction(table, &attributes, derived);
                }
                Shape::OneToMany { many } => {
                    let (holder, target) = match many {
                        Side::First => (first, second),
                        Side::Second => (second, first),
                    };
                    let prefix = if recursive { SUPERVISOR_PREFIX } else { "" };
                    fold_key(tables, holder.node, target.node, prefix);
                    fold_attributes(tables, relationship, &attributes, holder.node, derived);
                }
                Shape::OneToOne => {
                    let (holder, target) = one_to_one_holder(first, second);
                    diagnostics.push(Diagnostic::OneToOneDirection {
                        relationship: relationship.name.clone(),
                        holder: holder.node.name.clone(),
                        target: target.node.name.clone(),
                    });
                    let prefix = if recursive { SPOUSE_PREFIX } else { "" };
                    fold_key(tables, holder.node, target.node, prefix);
                    fold_attributes(tables, relationship, &attributes, holder.node, derived);
                }
            }
        }
        _ => {
            tracing::debug!(
                relationship = %relationship.name,
                participants = participants.len(),
                "n-ary relationship"
            );
            let table = junction_table(relationship, &attributes, &nodes, tables);
            push_junction(table, &attributes, derived);
        }
    }
}

fn fold_key(tables: &mut TableMap, holder: &Node, target: &Node, prefix: &str) {
    let keys = tables.full_key(&target.id);
    let Some(table) = tables.get_mut(&holder.id) else {
        return;
    };
    for key in keys {
        let wanted = format!("{prefix}{}", key.name);
        let name = table.unique_name(&wanted, &target.name);
        table.push(Column::foreign_key(name, target.name.clone()));
    }
}

fn fold_attributes(
    tables: &mut TableMap,
    relationship: &Node,
    attributes: &ResolvedAttributes,
    holder: &Node,
    derived: &mut Vec<ResolvedTable>,
) {
    let Some(table) = tables.get_mut(&holder.id) else {
        return;
    };
    for attribute in attributes.primary_keys.iter().chain(&attributes.ordinary) {
        let name = table.unique_name(attribute, &relationship.name);
        table.push(Column::attribute(name));
    }
    for attribute in &attributes.multivalued {
        derived.push(multivalued_table(table, attribute));
    }
}

fn push_junction(table: ResolvedTable, attributes: &ResolvedAttributes, derived: &mut Vec<ResolvedTable>) {
    let multivalued: Vec<ResolvedTable> = attributes
        .multivalued
        .iter()
        .map(|attribute| multivalued_table(&table, attribute))
        .collect();
    derived.push(table);
    derived.extend(multivalued);
}

pub fn junction_table(
    relationship: &Node,
    attributes: &ResolvedAttributes,
    participants: &[&Node],
    tables: &TableMap,
) -> ResolvedTable {
    let mut candidates: Vec<Column> = attributes
        .primary_keys
        .iter()
        .map(Column::key)
        .chain(attributes.ordinary.iter().map(Column::attribute))
        .collect();

    let mut seen: Vec<&str> = Vec::new();
    for participant in participants {
        let prefix = if seen.contains(&participant.id.as_str()) {
            OTHER_ROLE_PREFIX
        } else {
            ""
        };
        seen.push(&participant.id);
        for key in tables.full_key(&participant.id) {
            candidates.push(Column::inherited_key(
                format!("{prefix}{}", key.name),
                participant.name.clone(),
            ));
        }
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for column in &candidates {
        *counts.entry(column.name.clone()).or_default() += 1;
    }

    let mut table = ResolvedTable::new(relationship.name.clone(), TableKind::Junction);
    for column in candidates {
        let qualified = match &column.source_table {
            Some(source) if counts[&column.name] > 1 => Some(format!("{source}_{}", column.name)),
            _ => None,
        };
        let column = match qualified {
            Some(name) => column.renamed(name),
            None => column,
        };
        let name = numbered(&table, &column.name);
        table.push(column.renamed(name));
    }
    table
}

fn numbered(table: &ResolvedTable, candidate: &str) -> String {
    if !table.has_column(candidate) {
        return candidate.to_string();
    }
    (2..)
        .map(|n| format!("{candidate}_{n}"))
        .find(|name| !table.has_column(name))
        .unwrap_or_else(|| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram_ast::Diagram;

    fn entity_tables(diagram: &Diagram, keys: &[(&str, &str)]) -> TableMap {
        let mut tables = TableMap::new();
        for node in diagram.nodes.iter().filter(|n| n.is_entity()) {
            let mut table = ResolvedTable::new(node.name.clone(), TableKind::Entity);
            if let Some((_, key)) = keys.iter().find(|(id, _)| *id == node.id) {
                table.push(Column::key(*key));
            }
            tables.insert(&node.id, table);
        }
        tables
    }

    fn run(diagram: &Diagram, keys: &[(&str, &str)]) -> (TableMap, Vec<ResolvedTable>, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::new();
        let index = Adjacency::build(diagram, &mut diagnostics);
        let mut tables = entity_tables(diagram, keys);
        let derived = resolve_all(&index, &mut tables, &mut diagnostics);
        (tables, derived, diagnostics.into_vec())
    }

    fn binary(first: &str, second: &str) -> Diagram {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("a", "Employee"))
            .add(Node::relationship("r", "WorksIn"))
            .add(Node::entity("b", "Department"));
        diagram.connect("a", "r").cards(first, "");
        diagram.connect("r", "b").cards("", second);
        diagram
    }

    #[test]
    fn classification_table() {
        use Cardinality::*;
        assert_eq!(classify(&Many, &Many), Shape::ManyToMany);
        assert_eq!(classify(&Many, &One), Shape::OneToMany { many: Side::First });
        assert_eq!(classify(&Unspecified, &Many), Shape::OneToMany { many: Side::Second });
        assert_eq!(classify(&One, &Unspecified), Shape::OneToOne);
        assert_eq!(classify(&Other("x".into()), &One), Shape::OneToOne);
    }

    #[test]
    fn many_side_absorbs_key() {
        let diagram = binary("N", "1");
        let (tables, derived, _) = run(&diagram, &[("a", "emp_id"), ("b", "dept_no")]);
        assert!(derived.is_empty());
        let employee = tables.get("a").unwrap();
        assert_eq!(
            employee.column("dept_no"),
            Some(&Column::foreign_key("dept_no", "Department"))
        );
        assert_eq!(tables.get("b").unwrap().columns.len(), 1);
    }

    #[test]
    fn colliding_foreign_key_is_qualified() {
        let diagram = binary("N", "");
        let (tables, _, _) = run(&diagram, &[("a", "id"), ("b", "id")]);
        let employee = tables.get("a").unwrap();
        assert_eq!(
            employee.column("Department_id"),
            Some(&Column::foreign_key("Department_id", "Department"))
        );
    }

    #[test]
    fn relationship_attributes_follow_the_foreign_key() {
        let mut diagram = binary("1", "N");
        diagram.add(Node::attribute("since", "since"));
        diagram.connect("r", "since");
        let (tables, _, _) = run(&diagram, &[("a", "emp_id"), ("b", "dept_no")]);
        let department = tables.get("b").unwrap();
        let names: Vec<&str> = department.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["dept_no", "emp_id", "since"]);
    }

    #[test]
    fn one_to_one_imports_second_into_first() {
        let diagram = binary("1", "");
        let (tables, _, diagnostics) = run(&diagram, &[("a", "emp_id"), ("b", "dept_no")]);
        assert!(tables.get("a").unwrap().has_column("dept_no"));
        assert!(!tables.get("b").unwrap().has_column("emp_id"));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::OneToOneDirection {
                relationship: "WorksIn".into(),
                holder: "Employee".into(),
                target: "Department".into(),
            }]
        );
    }

    #[test]
    fn many_to_many_builds_junction_with_qualified_keys() {
        let diagram = binary("N", "M");
        let (tables, derived, _) = run(&diagram, &[("a", "id"), ("b", "id")]);
        assert_eq!(derived.len(), 1);
        let junction = &derived[0];
        assert_eq!(junction.name, "WorksIn");
        assert_eq!(junction.kind, TableKind::Junction);
        assert_eq!(
            junction.columns,
            vec![
                Column::inherited_key("Employee_id", "Employee"),
                Column::inherited_key("Department_id", "Department"),
            ]
        );
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn recursive_one_to_many_uses_supervisor_prefix() {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("e", "Employee"))
            .add(Node::relationship("r", "Supervises"));
        diagram.connect("e", "r").cards("1", "");
        diagram.connect("r", "e").cards("", "N");
        let (tables, derived, _) = run(&diagram, &[("e", "id")]);
        assert!(derived.is_empty());
        let employee = tables.get("e").unwrap();
        assert_eq!(
            employee.columns,
            vec![
                Column::key("id"),
                Column::foreign_key("supervisor_id", "Employee"),
            ]
        );
    }

    #[test]
    fn recursive_one_to_one_uses_spouse_prefix() {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("p", "Person"))
            .add(Node::relationship("r", "Marries"));
        diagram.connect("p", "r");
        diagram.connect("r", "p");
        let (tables, _, _) = run(&diagram, &[("p", "ssn")]);
        assert!(tables.get("p").unwrap().has_column("spouse_ssn"));
    }

    #[test]
    fn recursive_many_to_many_prefixes_second_role() {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("p", "Part"))
            .add(Node::relationship("r", "Contains"));
        diagram.connect("p", "r").cards("M", "");
        diagram.connect("r", "p").cards("", "N");
        let (_, derived, _) = run(&diagram, &[("p", "part_no")]);
        assert_eq!(
            derived[0].columns,
            vec![
                Column::inherited_key("part_no", "Part"),
                Column::inherited_key("other_part_no", "Part"),
            ]
        );
    }

    #[test]
    fn n_ary_relationship_gets_junction_table() {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("s", "Supplier"))
            .add(Node::entity("p", "Part"))
            .add(Node::entity("j", "Project"))
            .add(Node::relationship("r", "Supplies"))
            .add(Node::attribute("q", "quantity"));
        diagram.connect("s", "r").cards("1", "");
        diagram.connect("p", "r").cards("1", "");
        diagram.connect("j", "r").cards("1", "");
        diagram.connect("r", "q");
        let (_, derived, _) = run(
            &diagram,
            &[("s", "id"), ("p", "part_no"), ("j", "id")],
        );
        assert_eq!(
            derived[0].columns,
            vec![
                Column::attribute("quantity"),
                Column::inherited_key("Supplier_id", "Supplier"),
                Column::inherited_key("part_no", "Part"),
                Column::inherited_key("Project_id", "Project"),
            ]
        );
    }

    #[test]
    fn junction_multivalued_attribute_gets_own_table() {
        let mut diagram = binary("N", "N");
        diagram.add(Node::multivalued("t", "tag"));
        diagram.connect("r", "t");
        let (_, derived, _) = run(&diagram, &[("a", "emp_id"), ("b", "dept_no")]);
        let names: Vec<&str> = derived.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["WorksIn", "WorksIn_tag"]);
        assert_eq!(derived[1].primary_key().count(), 3);
    }

    #[test]
    fn lonely_relationship_is_skipped() {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("a", "A"))
            .add(Node::relationship("r", "Dangling"));
        diagram.connect("a", "r");
        let (tables, derived, diagnostics) = run(&diagram, &[("a", "id")]);
        assert!(derived.is_empty());
        assert_eq!(tables.get("a").unwrap().columns.len(), 1);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnresolvableRelationship {
                relationship: "Dangling".into(),
                participants: 1
            }]
        );
    }

    #[test]
    fn identifying_relationship_only_folds_attributes() {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("o", "Building"))
            .add(Node::entity("w", "Room").weak())
            .add(Node::relationship("r", "In").weak())
            .add(Node::attribute("f", "floor"));
        diagram.connect("o", "r").cards("1", "");
        diagram.connect("r", "w").cards("", "N");
        diagram.connect("r", "f");
        let (tables, derived, diagnostics) = run(&diagram, &[("o", "id"), ("w", "no")]);
        assert!(derived.is_empty());
        assert!(diagnostics.is_empty());
        let room = tables.get("w").unwrap();
        let names: Vec<&str> = room.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["no", "floor"]);
    }

    #[test]
    fn chained_identifying_attribute_lands_on_dependent_only() {
        let mut diagram = Diagram::new();
        diagram
            .add(Node::entity("a", "Building"))
            .add(Node::entity("b", "Room").weak())
            .add(Node::entity("c", "Seat").weak())
            .add(Node::relationship("r1", "In").weak())
            .add(Node::relationship("r2", "Has").weak())
            .add(Node::attribute("d", "installed_on"));
        diagram.connect("a", "r1").cards("1", "");
        diagram.connect("r1", "b").cards("", "N");
        diagram.connect("b", "r2").cards("1", "");
        diagram.connect("r2", "c").cards("", "N");
        diagram.connect("r2", "d");
        let (tables, derived, diagnostics) = run(
            &diagram,
            &[("a", "id"), ("b", "room_no"), ("c", "seat_no")],
        );
        assert!(derived.is_empty());
        assert!(diagnostics.is_empty());
        assert!(!tables.get("b").unwrap().has_column("installed_on"));
        let seat = tables.get("c").unwrap();
        let names: Vec<&str> = seat.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["seat_no", "installed_on"]);
    }
}
