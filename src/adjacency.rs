use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::diagram_ast::{Diagram, Node};
use crate::notation::Cardinality;

#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'d> {
    pub edge: usize,
    pub node: &'d Node,
    pub own_card: &'d Cardinality,
    pub card: &'d Cardinality,
}

#[derive(Debug)]
pub struct Adjacency<'d> {
    diagram: &'d Diagram,
    nodes: Vec<&'d Node>,
    by_id: HashMap<&'d str, usize>,
    incident: HashMap<&'d str, Vec<usize>>,
}

impl<'d> Adjacency<'d> {
    pub fn build(diagram: &'d Diagram, diagnostics: &mut Diagnostics) -> Self {
        let mut nodes = Vec::with_capacity(diagram.nodes.len());
        let mut by_id = HashMap::with_capacity(diagram.nodes.len());
        for node in &diagram.nodes {
            if by_id.contains_key(node.id.as_str()) {
                diagnostics.push(Diagnostic::DuplicateNode {
                    id: node.id.clone(),
                });
                continue;
            }
            by_id.insert(node.id.as_str(), nodes.len());
            nodes.push(node);
        }

        let mut incident: HashMap<&'d str, Vec<usize>> = HashMap::new();
        for (i, edge) in diagram.edges.iter().enumerate() {
            let missing = [edge.start.as_str(), edge.end.as_str()]
                .into_iter()
                .find(|id| !by_id.contains_key(*id));
            if let Some(node_id) = missing {
                diagnostics.push(Diagnostic::MissingEndpoint {
                    edge: i,
                    node_id: node_id.to_string(),
                });
                continue;
            }
            if edge.start == edge.end {
                tracing::debug!(node = %edge.start, "ignoring connection from a node to itself");
                continue;
            }
            incident.entry(edge.start.as_str()).or_default().push(i);
            incident.entry(edge.end.as_str()).or_default().push(i);
        }

        Self {
            diagram,
            nodes,
            by_id,
            incident,
        }
    }

    pub fn node(&self, id: &str) -> Option<&'d Node> {
        self.by_id.get(id).map(|&i| self.nodes[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &'d Node> + '_ {
        self.nodes.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = Neighbor<'d>> + 'a {
        self.incident
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(move |&i| {
                let edge = &self.diagram.edges[i];
                let other = edge.other_end(id)?;
                Some(Neighbor {
                    edge: i,
                    node: self.node(other)?,
                    own_card: edge.card_at(id)?,
                    card: edge.card_at(other)?,
                })
            })
    }

    pub fn entity_neighbors(&self, id: &str) -> Vec<Neighbor<'d>> {
        self.neighbors(id).filter(|n| n.node.is_entity()).collect()
    }
}
