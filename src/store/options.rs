//! Option and result types shared by stores and views

use serde::{Deserialize, Serialize};

use crate::projection::Projection;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field path to sort by
    pub field: String,
    /// Sort direction
    #[serde(default = "default_direction")]
    pub direction: SortDirection,
}

fn default_direction() -> SortDirection {
    SortDirection::Asc
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Read options.
///
/// Views only touch `fields`; the rest passes through to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    /// Field projection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Projection>,
    /// Sort keys, most significant first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,
    /// Number of leading matches to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,
    /// Maximum number of documents returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: Projection) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Write options for update and upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Apply to every match instead of only the first
    #[serde(default)]
    pub multi: bool,
}

impl UpdateOptions {
    /// Update every matching document
    pub fn multi() -> Self {
        Self { multi: true }
    }

    /// Update the first matching document only
    pub fn single() -> Self {
        Self { multi: false }
    }
}

/// Outcome of an upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertResult {
    /// Documents updated, or 1 if a document was inserted
    pub number_affected: usize,
    /// Identifier of the inserted document, if an insert happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<String>,
}

impl UpsertResult {
    pub fn updated(count: usize) -> Self {
        Self {
            number_affected: count,
            inserted_id: None,
        }
    }

    pub fn inserted(id: impl Into<String>) -> Self {
        Self {
            number_affected: 1,
            inserted_id: Some(id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_options_from_json() {
        let options: FindOptions = serde_json::from_value(json!({
            "fields": {"title": 1},
            "sort": [{"field": "year", "direction": "desc"}, {"field": "title"}],
            "limit": 2
        }))
        .unwrap();

        assert_eq!(options.fields, Some(Projection::include(["title"])));
        assert_eq!(options.sort, vec![SortSpec::desc("year"), SortSpec::asc("title")]);
        assert_eq!(options.limit, Some(2));
        assert_eq!(options.skip, None);
    }

    #[test]
    fn test_update_options_default_single() {
        assert!(!UpdateOptions::default().multi);
        assert!(UpdateOptions::multi().multi);
    }
}
