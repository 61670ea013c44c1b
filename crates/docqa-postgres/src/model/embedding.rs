//! Vector embedding model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use pgvector::Vector;
use uuid::Uuid;

use crate::schema::vector_embeddings;

/// A stored chunk of text together with its embedding.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vector_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VectorEmbedding {
    /// Unique embedding identifier.
    pub id: Uuid,
    /// Collection this embedding belongs to.
    pub collection_id: Uuid,
    /// Embedding vector.
    pub embedding: Vector,
    /// The chunk text that was embedded.
    pub document: String,
    /// Chunk metadata (source, page, offsets).
    pub metadata: serde_json::Value,
    /// Timestamp when the embedding was stored.
    pub created_at: Timestamp,
}

/// Data for inserting a new embedding.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vector_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVectorEmbedding {
    /// Owning collection.
    pub collection_id: Uuid,
    /// Embedding vector.
    pub embedding: Vector,
    /// Chunk text.
    pub document: String,
    /// Chunk metadata.
    pub metadata: serde_json::Value,
}

/// An embedding with its similarity to a query.
#[derive(Debug, Clone)]
pub struct ScoredVectorEmbedding {
    /// The stored embedding.
    pub embedding: VectorEmbedding,
    /// Cosine similarity (`1 - cosine distance`), higher is more similar.
    pub score: f64,
}
