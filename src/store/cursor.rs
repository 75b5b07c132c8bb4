//! Materialized query results

use serde_json::Value;

/// Ordered documents returned by a find
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cursor {
    documents: Vec<Value>,
}

impl Cursor {
    pub fn new(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    /// Number of documents in the result
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn first(&self) -> Option<&Value> {
        self.documents.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.documents.iter()
    }

    /// Values of `field` across the result, skipping documents without it
    pub fn pluck(&self, field: &str) -> Vec<Value> {
        self.documents
            .iter()
            .filter_map(|doc| doc.get(field).cloned())
            .collect()
    }

    /// Consumes the cursor, returning all documents
    pub fn fetch(self) -> Vec<Value> {
        self.documents
    }
}

impl IntoIterator for Cursor {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}
