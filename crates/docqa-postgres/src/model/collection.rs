//! Vector collection model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::vector_collections;

/// A named group of embeddings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vector_collections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VectorCollection {
    /// Unique collection identifier.
    pub id: Uuid,
    /// Collection name, unique across the database.
    pub name: String,
    /// Free-form metadata (JSON).
    pub metadata: serde_json::Value,
    /// Timestamp when the collection was created.
    pub created_at: Timestamp,
}

impl VectorCollection {
    /// Returns the creation timestamp.
    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

/// Data for creating a new collection.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vector_collections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVectorCollection {
    /// Collection name.
    pub name: String,
    /// Metadata.
    pub metadata: serde_json::Value,
}

impl NewVectorCollection {
    /// Creates a collection record with empty metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: serde_json::Value::Object(Default::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_collection_has_empty_metadata() {
        let collection = NewVectorCollection::new("challenge_docs");
        assert_eq!(collection.name, "challenge_docs");
        assert_eq!(collection.metadata, serde_json::json!({}));
    }
}
