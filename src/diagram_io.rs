use serde::{Deserialize, Serialize};

use crate::diagram_ast::{AttributeKind, Diagram, LineStyle, Node, NodeKind, Position};
use crate::error::{Error, Result};
use crate::notation::parse_length;

pub const SCHEMA_ELEMENT_TYPE: &str = "schema";
pub const SCHEMA_ELEMENT_WIDTH: &str = "450px";
const SCHEMA_ELEMENT_GAP: f64 = 40.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramDocument {
    pub elements: Vec<ElementRecord>,
    pub lines: Vec<LineRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub left: String,
    pub top: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    pub text: String,
    pub is_weak: bool,
    #[serde(rename = "isPK")]
    pub is_pk: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineRecord {
    pub start_id: String,
    pub end_id: String,
    pub card_start: String,
    pub card_end: String,
    pub line_type: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DiagramDocument {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Output)
    }

    pub fn to_diagram(&self) -> Diagram {
        let mut diagram = Diagram::new();
        for element in &self.elements {
            diagram.add(element.to_node());
        }
        for line in &self.lines {
            diagram
                .connect(&line.start_id, &line.end_id)
                .cards(&line.card_start, &line.card_end)
                .style(line_style(&line.line_type));
        }
        diagram
    }

    pub fn embed_schema(&mut self, html: &str) -> &ElementRecord {
        let right_edge = self
            .elements
            .iter()
            .map(|e| {
                let left = parse_length(&e.left).unwrap_or(0.0);
                let width = e.width.as_deref().and_then(parse_length).unwrap_or(0.0);
                left + width
            })
            .fold(0.0_f64, f64::max);
        let top = self
            .elements
            .iter()
            .filter_map(|e| parse_length(&e.top))
            .reduce(f64::min)
            .unwrap_or(0.0);

        let element = ElementRecord {
            id: format!("element-{}", self.next_element_number()),
            kind: SCHEMA_ELEMENT_TYPE.to_string(),
            left: format!("{}px", right_edge + SCHEMA_ELEMENT_GAP),
            top: format!("{top}px"),
            width: Some(SCHEMA_ELEMENT_WIDTH.to_string()),
            height: Some("auto".to_string()),
            text: html.to_string(),
            ..Default::default()
        };
        tracing::debug!(id = %element.id, "embedding schema listing");
        self.elements.push(element);
        &self.elements[self.elements.len() - 1]
    }

    fn next_element_number(&self) -> u64 {
        self.elements
            .iter()
            .filter_map(|e| e.id.rsplit('-').next()?.parse::<u64>().ok())
            .max()
            .map_or(0, |n| n + 1)
    }
}

impl ElementRecord {
    pub fn node_kind(&self) -> NodeKind {
        match self.kind.as_str() {
            "entity" => NodeKind::Entity,
            "relationship" => NodeKind::Relationship,
            "attribute" => NodeKind::Attribute(AttributeKind::Simple),
            "attribute-multi" => NodeKind::Attribute(AttributeKind::Multivalued),
            "attribute-derived" => NodeKind::Attribute(AttributeKind::Derived),
            "isa" => NodeKind::Isa,
            "label" | SCHEMA_ELEMENT_TYPE => NodeKind::Label,
            other => {
                tracing::warn!(id = %self.id, kind = other, "unknown element type; treated as a label");
                NodeKind::Label
            }
        }
    }

    pub fn to_node(&self) -> Node {
        let mut node = Node::new(self.id.clone(), self.node_kind(), self.text.clone());
        node.position = Position {
            x: self.coordinate(&self.left, "left"),
            y: self.coordinate(&self.top, "top"),
        };
        node.is_weak = self.is_weak;
        node.is_primary_key = self.is_pk;
        node
    }

    fn coordinate(&self, value: &str, axis: &str) -> f64 {
        parse_length(value).unwrap_or_else(|| {
            if !value.is_empty() {
                tracing::debug!(id = %self.id, axis, value, "unreadable position; using 0");
            }
            0.0
        })
    }
}

fn line_style(tag: &str) -> LineStyle {
    match tag {
        "double" => LineStyle::Double,
        "dashed" => LineStyle::Dashed,
        _ => LineStyle::Solid,
    }
}
