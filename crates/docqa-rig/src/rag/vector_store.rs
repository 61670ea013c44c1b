//! Vector store backed by PostgreSQL with pgvector.

use docqa_postgres::model::NewVectorEmbedding;
use docqa_postgres::query::{VectorCollectionRepository, VectorEmbeddingRepository};
use docqa_postgres::{PgClient, Vector};
use uuid::Uuid;

use super::searcher::RetrievedChunk;
use super::splitter::{Chunk, ChunkMetadata};
use crate::{Result, TRACING_TARGET};

/// A chunk paired with its embedding, ready to be stored.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    /// The chunk.
    pub chunk: Chunk,
    /// Its embedding.
    pub embedding: Vec<f32>,
}

/// Storage for embedded chunks with similarity search.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a batch of embedded chunks; returns how many were written.
    async fn add_documents(&self, documents: Vec<EmbeddedChunk>) -> Result<usize>;

    /// Returns at most `k` chunks, most similar first, with cosine scores.
    async fn similarity_search_with_score(
        &self,
        query: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>>;

    /// Returns the number of stored chunks.
    async fn count(&self) -> Result<u64>;

    /// Removes every stored chunk; returns how many were removed.
    async fn clear(&self) -> Result<usize>;
}

/// PostgreSQL-backed store scoped to one named collection.
#[derive(Debug, Clone)]
pub struct PgVectorStore {
    db: PgClient,
    collection_id: Uuid,
    collection_name: String,
}

impl PgVectorStore {
    /// Opens the collection with the given name, creating it when missing.
    pub async fn open(db: PgClient, collection_name: impl Into<String>) -> Result<Self> {
        let collection_name = collection_name.into();
        let mut conn = db.get_connection().await?;
        let collection = conn.find_or_create_collection(&collection_name).await?;
        drop(conn);

        tracing::debug!(
            target: TRACING_TARGET,
            collection = %collection_name,
            collection_id = %collection.id,
            created_at = %collection.created_at(),
            "Opened vector collection"
        );

        Ok(Self {
            db,
            collection_id: collection.id,
            collection_name,
        })
    }
}

fn chunk_metadata_json(chunk: &Chunk) -> serde_json::Value {
    serde_json::json!({
        "source": chunk.metadata.source,
        "page": chunk.metadata.page,
        "chunk_index": chunk.metadata.chunk_index,
        "start_offset": chunk.metadata.start_offset,
        "end_offset": chunk.metadata.end_offset,
        "content_sha256": chunk.content_sha256(),
    })
}

#[async_trait::async_trait]
impl DocumentStore for PgVectorStore {
    async fn add_documents(&self, documents: Vec<EmbeddedChunk>) -> Result<usize> {
        let new_embeddings: Vec<NewVectorEmbedding> = documents
            .into_iter()
            .map(|document| NewVectorEmbedding {
                collection_id: self.collection_id,
                metadata: chunk_metadata_json(&document.chunk),
                embedding: Vector::from(document.embedding),
                document: document.chunk.text,
            })
            .collect();

        let mut conn = self.db.get_connection().await?;
        let inserted = conn.create_embeddings(new_embeddings).await?;
        Ok(inserted)
    }

    async fn similarity_search_with_score(
        &self,
        query: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        let limit = i64::try_from(k).unwrap_or(i64::MAX);
        let mut conn = self.db.get_connection().await?;
        let rows = conn
            .search_scored_embeddings(self.collection_id, Vector::from(query), limit)
            .await?;

        rows.into_iter()
            .map(|row| {
                let metadata: ChunkMetadata = serde_json::from_value(row.embedding.metadata)?;
                Ok(RetrievedChunk::new(row.embedding.document, row.score, metadata))
            })
            .collect()
    }

    async fn count(&self) -> Result<u64> {
        let mut conn = self.db.get_connection().await?;
        let count = conn.count_embeddings(self.collection_id).await?;
        Ok(count.max(0) as u64)
    }

    async fn clear(&self) -> Result<usize> {
        let mut conn = self.db.get_connection().await?;
        let deleted = conn.delete_embeddings(self.collection_id).await?;

        tracing::info!(
            target: TRACING_TARGET,
            collection = %self.collection_name,
            deleted,
            "Cleared vector collection"
        );
        Ok(deleted)
    }
}
