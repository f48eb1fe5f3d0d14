use crate::notation::{Cardinality, parse_cardinality};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Simple,
    Multivalued,
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Entity,
    Attribute(AttributeKind),
    Relationship,
    Isa,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub position: Position,
    pub is_weak: bool,
    pub is_primary_key: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into().trim().to_string(),
            position: Position::default(),
            is_weak: false,
            is_primary_key: false,
        }
    }

    pub fn entity(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Entity, name)
    }

    pub fn attribute(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Attribute(AttributeKind::Simple), name)
    }

    pub fn multivalued(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Attribute(AttributeKind::Multivalued), name)
    }

    pub fn derived(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Attribute(AttributeKind::Derived), name)
    }

    pub fn relationship(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Relationship, name)
    }

    pub fn isa(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Isa, "ISA")
    }

    pub fn label(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Label, text)
    }

    pub fn weak(mut self) -> Self {
        self.is_weak = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn is_entity(&self) -> bool {
        self.kind == NodeKind::Entity
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, NodeKind::Attribute(_))
    }

    pub fn is_relationship(&self) -> bool {
        self.kind == NodeKind::Relationship
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Double,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub start: String,
    pub end: String,
    pub start_card: Cardinality,
    pub end_card: Cardinality,
    pub style: LineStyle,
}

impl Edge {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            start_card: Cardinality::Unspecified,
            end_card: Cardinality::Unspecified,
            style: LineStyle::Solid,
        }
    }

    pub fn cards(&mut self, start: &str, end: &str) -> &mut Self {
        self.start_card = parse_cardinality(start);
        self.end_card = parse_cardinality(end);
        self
    }

    pub fn style(&mut self, style: LineStyle) -> &mut Self {
        self.style = style;
        self
    }

    pub fn card_at(&self, id: &str) -> Option<&Cardinality> {
        if self.start == id {
            Some(&self.start_card)
        } else if self.end == id {
            Some(&self.end_card)
        } else {
            None
        }
    }

    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.start == id {
            Some(&self.end)
        } else if self.end == id {
            Some(&self.start)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn connect(&mut self, start: &str, end: &str) -> &mut Edge {
        self.edges.push(Edge::new(start, end));
        let last = self.edges.len() - 1;
        &mut self.edges[last]
    }
}
