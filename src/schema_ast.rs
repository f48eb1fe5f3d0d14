use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub is_pk: bool,
    pub is_fk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
}

impl Column {
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_pk: true,
            is_fk: false,
            source_table: None,
        }
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_pk: false,
            is_fk: false,
            source_table: None,
        }
    }

    pub fn foreign_key(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_pk: false,
            is_fk: true,
            source_table: Some(source.into()),
        }
    }

    pub fn inherited_key(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_pk: true,
            is_fk: true,
            source_table: Some(source.into()),
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Entity,
    Junction,
    Multivalued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTable {
    pub name: String,
    pub kind: TableKind,
    pub columns: Vec<Column>,
}

impl ResolvedTable {
    pub fn new(name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            columns: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn push(&mut self, column: Column) -> bool {
        if self.has_column(&column.name) {
            return false;
        }
        self.columns.push(column);
        true
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_pk)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_fk)
    }

    pub fn full_key(&self) -> Vec<Column> {
        self.primary_key().cloned().collect()
    }

    pub fn display_order(&self) -> Vec<&Column> {
        let keys = self.columns.iter().filter(|c| c.is_pk);
        let plain = self.columns.iter().filter(|c| !c.is_pk && !c.is_fk);
        let foreign = self.columns.iter().filter(|c| !c.is_pk && c.is_fk);
        keys.chain(plain).chain(foreign).collect()
    }

    pub fn unique_name(&self, candidate: &str, qualifier: &str) -> String {
        if !self.has_column(candidate) {
            return candidate.to_string();
        }
        let qualified = format!("{qualifier}_{candidate}");
        if !self.has_column(&qualified) {
            return qualified;
        }
        (2..)
            .map(|n| format!("{qualified}_{n}"))
            .find(|name| !self.has_column(name))
            .unwrap_or(qualified)
    }
}

#[derive(Debug, Default)]
pub struct TableMap {
    tables: Vec<ResolvedTable>,
    by_node: HashMap<String, usize>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node_id: &str, table: ResolvedTable) {
        match self.by_node.get(node_id) {
            Some(&i) => self.tables[i] = table,
            None => {
                self.by_node.insert(node_id.to_string(), self.tables.len());
                self.tables.push(table);
            }
        }
    }

    pub fn get(&self, node_id: &str) -> Option<&ResolvedTable> {
        self.by_node.get(node_id).map(|&i| &self.tables[i])
    }

    pub fn get_mut(&mut self, node_id: &str) -> Option<&mut ResolvedTable> {
        self.by_node.get(node_id).map(|&i| &mut self.tables[i])
    }

    pub fn full_key(&self, node_id: &str) -> Vec<Column> {
        self.get(node_id).map(ResolvedTable::full_key).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn into_tables(self) -> Vec<ResolvedTable> {
        self.tables
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub tables: Vec<ResolvedTable>,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&ResolvedTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn base_tables(&self) -> impl Iterator<Item = &ResolvedTable> {
        self.tables.iter().filter(|t| t.kind == TableKind::Entity)
    }

    pub fn derived_tables(&self) -> impl Iterator<Item = &ResolvedTable> {
        self.tables.iter().filter(|t| t.kind != TableKind::Entity)
    }
}
