use crate::adjacency::Adjacency;
use crate::diagram_ast::Node;
use crate::notation::Cardinality;
use crate::schema_ast::{Column, TableMap};

#[derive(Debug, Clone, Copy)]
pub struct Ownership<'d> {
    pub dependent: &'d Node,
    pub owner: &'d Node,
    pub relationship: &'d Node,
}

pub fn ownerships<'d>(index: &Adjacency<'d>) -> Vec<Ownership<'d>> {
    let mut links = Vec::new();
    for weak in index.nodes().filter(|n| n.is_entity() && n.is_weak) {
        for link in index
            .neighbors(&weak.id)
            .filter(|n| n.node.is_relationship() && n.node.is_weak)
        {
            for other in index.entity_neighbors(&link.node.id) {
                if other.node.id == weak.id || !is_owner(link.own_card, other.node, other.card) {
                    continue;
                }
                if links.iter().any(|l: &Ownership<'_>| {
                    l.dependent.id == weak.id && l.owner.id == other.node.id
                }) {
                    continue;
                }
                links.push(Ownership {
                    dependent: weak,
                    owner: other.node,
                    relationship: link.node,
                });
            }
        }
    }
    links
}

/// A weak candidate on the many side of a one-sided weak entity is the next
/// link down the chain, not an owner.
pub fn is_owner(weak_card: &Cardinality, candidate: &Node, candidate_card: &Cardinality) -> bool {
    !(candidate.is_weak && candidate_card.is_many() && !weak_card.is_many())
}

pub fn is_identifying(relationship: &Node, participants: &[&Node]) -> bool {
    relationship.is_weak && participants.iter().any(|p| p.is_weak)
}

pub fn propagate_pass(links: &[Ownership<'_>], tables: &mut TableMap) -> usize {
    let mut added = 0;
    for link in links {
        let keys = tables.full_key(&link.owner.id);
        let Some(table) = tables.get_mut(&link.dependent.id) else {
            continue;
        };
        for key in keys {
            if table.push(Column::inherited_key(key.name.clone(), link.owner.name.clone())) {
                tracing::debug!(
                    weak = %link.dependent.name,
                    owner = %link.owner.name,
                    key = %key.name,
                    "imported owner key"
                );
                added += 1;
            }
        }
    }
    added
}
