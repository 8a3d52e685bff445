//! Storage trait, query filters and write batches.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Result, StackError};

/// Filter operations for querying records.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Field equals value
    Eq,
    /// Field does not equal value
    Ne,
    /// Field contains value (string/array)
    Contains,
}

/// A filter for querying records.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: serde_json::Value,
}

impl Filter {
    fn new(field: impl Into<String>, op: FilterOp, value: impl Serialize) -> Self {
        Self {
            field: field.into(),
            op,
            value: serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Equality filter; the indexed lookups (`section_id`, `tool_id`) use this.
    pub fn eq(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::new(field, FilterOp::Contains, value)
    }

    /// Check if a record matches this filter. A missing field is treated as null.
    pub fn matches(&self, record: &serde_json::Value) -> bool {
        let field_value = record.get(&self.field).unwrap_or(&serde_json::Value::Null);

        match &self.op {
            FilterOp::Eq => *field_value == self.value,
            FilterOp::Ne => *field_value != self.value,
            FilterOp::Contains => match (field_value, &self.value) {
                (serde_json::Value::String(s), serde_json::Value::String(needle)) => s.contains(needle.as_str()),
                (serde_json::Value::Array(arr), value) => arr.contains(value),
                _ => false,
            },
        }
    }
}

/// Records stored in a collection are keyed by their `id` field.
pub trait HasId {
    fn id(&self) -> &str;
}

/// One write in an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a record; fails if its id already exists
    Create {
        collection: String,
        id: String,
        record: serde_json::Value,
    },
    /// Replace an existing record; fails if its id is missing
    Update {
        collection: String,
        id: String,
        record: serde_json::Value,
    },
    /// Remove an existing record; fails if its id is missing
    Delete { collection: String, id: String },
}

impl WriteOp {
    pub fn create<T: Serialize + HasId>(collection: &str, record: &T) -> Result<Self> {
        Ok(WriteOp::Create {
            collection: collection.to_string(),
            id: record.id().to_string(),
            record: serde_json::to_value(record)?,
        })
    }

    pub fn update<T: Serialize + HasId>(collection: &str, record: &T) -> Result<Self> {
        Ok(WriteOp::Update {
            collection: collection.to_string(),
            id: record.id().to_string(),
            record: serde_json::to_value(record)?,
        })
    }

    pub fn delete(collection: &str, id: &str) -> Self {
        WriteOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Create { collection, .. } | WriteOp::Update { collection, .. } | WriteOp::Delete { collection, .. } => {
                collection
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            WriteOp::Create { id, .. } | WriteOp::Update { id, .. } | WriteOp::Delete { id, .. } => id,
        }
    }

    /// Apply this op to an in-memory collection.
    pub fn apply_to(&self, records: &mut Vec<serde_json::Value>) -> Result<()> {
        let position = records
            .iter()
            .position(|r| r.get("id").and_then(|v| v.as_str()) == Some(self.id()));

        match (self, position) {
            (WriteOp::Create { record, .. }, None) => records.push(record.clone()),
            (WriteOp::Create { collection, id, .. }, Some(_)) => {
                return Err(StackError::Storage(format!("Duplicate id in {}: {}", collection, id)));
            }
            (WriteOp::Update { record, .. }, Some(pos)) => records[pos] = record.clone(),
            (WriteOp::Delete { .. }, Some(pos)) => {
                records.remove(pos);
            }
            (WriteOp::Update { collection, id, .. } | WriteOp::Delete { collection, id }, None) => {
                return Err(StackError::Storage(format!("Record not found in {}: {}", collection, id)));
            }
        }
        Ok(())
    }
}

/// Storage trait for CRUD operations on records.
pub trait Storage: Send + Sync {
    /// Create a new record.
    fn create<T: Serialize + DeserializeOwned + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        self.apply(&[WriteOp::create(collection, record)?])
    }

    /// Get a record by ID.
    fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>>;

    /// Update an existing record.
    fn update<T: Serialize + DeserializeOwned + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        self.apply(&[WriteOp::update(collection, record)?])
    }

    /// Delete a record by ID.
    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.apply(&[WriteOp::delete(collection, id)])
    }

    /// Query records matching every filter.
    fn query<T: DeserializeOwned>(&self, collection: &str, filters: &[Filter]) -> Result<Vec<T>>;

    /// List all records in a collection.
    fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        self.query(collection, &[])
    }

    /// Apply a batch of writes, all or nothing.
    fn apply(&self, ops: &[WriteOp]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_eq_matches() {
        let filter = Filter::eq("section_id", "s1");
        assert!(filter.matches(&json!({"id": "1", "section_id": "s1"})));
        assert!(!filter.matches(&json!({"id": "1", "section_id": "s2"})));
    }

    #[test]
    fn test_filter_eq_null_matches_missing_field() {
        let filter = Filter::eq("subsection_id", serde_json::Value::Null);
        assert!(filter.matches(&json!({"id": "1"})));
        assert!(filter.matches(&json!({"id": "1", "subsection_id": null})));
        assert!(!filter.matches(&json!({"id": "1", "subsection_id": "sub"})));
    }

    #[test]
    fn test_filter_ne() {
        let filter = Filter::ne("tool_id", "react");
        assert!(filter.matches(&json!({"id": "1", "tool_id": "vue"})));
        assert!(!filter.matches(&json!({"id": "1", "tool_id": "react"})));
    }

    #[test]
    fn test_filter_contains() {
        assert!(Filter::contains("name", "base").matches(&json!({"name": "Supabase"})));
        assert!(!Filter::contains("name", "foo").matches(&json!({"name": "bar"})));
        assert!(Filter::contains("tags", "x").matches(&json!({"tags": ["x", "y"]})));
        assert!(!Filter::contains("count", "1").matches(&json!({"count": 1})));
    }

    #[test]
    fn test_write_op_apply_create_and_duplicate() {
        let mut records = Vec::new();
        let op = WriteOp::Create {
            collection: "tools".to_string(),
            id: "a".to_string(),
            record: json!({"id": "a"}),
        };
        op.apply_to(&mut records).unwrap();
        assert_eq!(records.len(), 1);

        let err = op.apply_to(&mut records).unwrap_err();
        assert!(err.to_string().contains("Duplicate id"));
    }

    #[test]
    fn test_write_op_update_and_delete_require_existing() {
        let mut records = vec![json!({"id": "a", "name": "old"})];

        WriteOp::Update {
            collection: "tools".to_string(),
            id: "a".to_string(),
            record: json!({"id": "a", "name": "new"}),
        }
        .apply_to(&mut records)
        .unwrap();
        assert_eq!(records[0]["name"], "new");

        assert!(WriteOp::delete("tools", "missing").apply_to(&mut records).is_err());
        WriteOp::delete("tools", "a").apply_to(&mut records).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_write_op_accessors() {
        let op = WriteOp::delete("pinned_tools", "p1");
        assert_eq!(op.collection(), "pinned_tools");
        assert_eq!(op.id(), "p1");
    }
}
