//! Operation Model
//!
//! Operations carrying a document into the pipeline. Writes are always
//! validated; updates only when the collection's rules ask for it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document-carrying operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Write(WriteOp),
    Update(UpdateOp),
}

impl Operation {
    /// Target collection
    pub fn collection(&self) -> &str {
        match self {
            Self::Write(w) => &w.collection,
            Self::Update(u) => &u.collection,
        }
    }

    /// Operation name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Write(_) => "write",
            Self::Update(_) => "update",
        }
    }

    /// The data the validation stage checks
    pub fn document(&self) -> &Value {
        match self {
            Self::Write(w) => &w.document,
            Self::Update(u) => &u.updates,
        }
    }
}

/// Write a new document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteOp {
    pub collection: String,
    pub document: Value,
}

/// Partial update of an existing document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOp {
    pub collection: String,
    pub id: String,
    pub updates: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_operation() {
        let json = r#"{
            "op": "write",
            "collection": "users",
            "document": {"name": "Alice"}
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();

        assert!(matches!(op, Operation::Write(_)));
        assert_eq!(op.name(), "write");
        assert_eq!(op.collection(), "users");
        assert_eq!(op.document()["name"], "Alice");
    }

    #[test]
    fn test_update_document_is_updates() {
        let json = r#"{"op": "update", "collection": "users", "id": "u1", "updates": {"age": 3}}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op.name(), "update");
        assert_eq!(op.document()["age"], 3);
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let json = r#"{"op": "read", "collection": "users", "id": "u1"}"#;
        assert!(serde_json::from_str::<Operation>(json).is_err());
    }
}
