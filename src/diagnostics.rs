use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("connection #{edge} references missing node `{node_id}`; connection ignored")]
    MissingEndpoint { edge: usize, node_id: String },

    #[error("node id `{id}` is used more than once; later definition ignored")]
    DuplicateNode { id: String },

    #[error("relationship `{relationship}` connects {participants} entity(ies); skipped")]
    UnresolvableRelationship {
        relationship: String,
        participants: usize,
    },

    #[error("ISA node `{isa}` connects {entities} entity(ies); skipped")]
    UnresolvableHierarchy { isa: String, entities: usize },

    #[error("key propagation still changing after {passes} passes; aborted")]
    PropagationLimit { passes: usize },

    #[error("attribute `{attribute}` under `{owner}` closes a cycle; link ignored")]
    AttributeCycle { owner: String, attribute: String },

    #[error(
        "one-to-one relationship `{relationship}`: `{holder}` takes the foreign key to `{target}` (declaration order)"
    )]
    OneToOneDirection {
        relationship: String,
        holder: String,
        target: String,
    },

    #[error("entity `{entity}` has no primary key")]
    MissingPrimaryKey { entity: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::OneToOneDirection { .. } => Severity::Note,
            Diagnostic::PropagationLimit { .. } | Diagnostic::AttributeCycle { .. } => {
                Severity::Error
            }
            Diagnostic::MissingEndpoint { .. }
            | Diagnostic::DuplicateNode { .. }
            | Diagnostic::UnresolvableRelationship { .. }
            | Diagnostic::UnresolvableHierarchy { .. }
            | Diagnostic::MissingPrimaryKey { .. } => Severity::Warning,
        }
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Note => tracing::debug!("{diagnostic}"),
            Severity::Warning | Severity::Error => tracing::warn!("{diagnostic}"),
        }
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    pub severity: Severity,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity(),
            message: diagnostic.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities() {
        let note = Diagnostic::OneToOneDirection {
            relationship: "Marries".into(),
            holder: "Person".into(),
            target: "Person".into(),
        };
        assert_eq!(note.severity(), Severity::Note);
        assert_eq!(
            Diagnostic::PropagationLimit { passes: 4 }.severity(),
            Severity::Error
        );
        assert_eq!(
            Diagnostic::MissingPrimaryKey { entity: "A".into() }.severity(),
            Severity::Warning
        );
    }

    #[test]
    fn messages_name_the_culprit() {
        let d = Diagnostic::MissingEndpoint {
            edge: 3,
            node_id: "element-9".into(),
        };
        let msg = d.to_string();
        assert!(msg.contains("#3"), "got: {msg}");
        assert!(msg.contains("element-9"), "got: {msg}");
    }

    #[test]
    fn record_carries_severity_and_message() {
        let d = Diagnostic::UnresolvableHierarchy {
            isa: "ISA".into(),
            entities: 1,
        };
        let record = DiagnosticRecord::from(&d);
        assert_eq!(record.severity, Severity::Warning);
        assert_eq!(record.message, d.to_string());
    }

    #[test]
    fn collector_keeps_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.push(Diagnostic::DuplicateNode { id: "a".into() });
        diagnostics.push(Diagnostic::DuplicateNode { id: "b".into() });
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.into_vec(),
            vec![
                Diagnostic::DuplicateNode { id: "a".into() },
                Diagnostic::DuplicateNode { id: "b".into() },
            ]
        );
    }
}
