//! Vector embedding repository for storing chunks and searching them.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pgvector::Vector;
use uuid::Uuid;

use crate::model::{NewVectorEmbedding, ScoredVectorEmbedding, VectorEmbedding};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for vector embedding database operations.
///
/// All operations are scoped to a single collection.
pub trait VectorEmbeddingRepository {
    /// Inserts multiple embeddings in a single statement.
    ///
    /// Returns the number of inserted rows.
    fn create_embeddings(
        &mut self,
        new_embeddings: Vec<NewVectorEmbedding>,
    ) -> impl Future<Output = PgResult<usize>> + Send;

    /// Searches a collection by cosine similarity.
    ///
    /// Returns at most `limit` embeddings, most similar first, each paired
    /// with its score (`1 - cosine distance`).
    fn search_scored_embeddings(
        &mut self,
        collection_id: Uuid,
        query_embedding: Vector,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<ScoredVectorEmbedding>>> + Send;

    /// Gets the number of embeddings stored in a collection.
    fn count_embeddings(
        &mut self,
        collection_id: Uuid,
    ) -> impl Future<Output = PgResult<i64>> + Send;

    /// Deletes every embedding of a collection.
    fn delete_embeddings(
        &mut self,
        collection_id: Uuid,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl VectorEmbeddingRepository for PgConnection {
    async fn create_embeddings(
        &mut self,
        new_embeddings: Vec<NewVectorEmbedding>,
    ) -> PgResult<usize> {
        use schema::vector_embeddings;

        if new_embeddings.is_empty() {
            return Ok(0);
        }

        let inserted = diesel::insert_into(vector_embeddings::table)
            .values(&new_embeddings)
            .execute(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, inserted, "Inserted embeddings");
        Ok(inserted)
    }

    async fn search_scored_embeddings(
        &mut self,
        collection_id: Uuid,
        query_embedding: Vector,
        limit: i64,
    ) -> PgResult<Vec<ScoredVectorEmbedding>> {
        use pgvector::VectorExpressionMethods;
        use schema::vector_embeddings::{self, dsl};

        if limit <= 0 {
            return Ok(vec![]);
        }

        // Cosine distance ranges from 0 (identical) to 2 (opposite).
        let rows: Vec<(VectorEmbedding, f64)> = vector_embeddings::table
            .filter(dsl::collection_id.eq(collection_id))
            .order(dsl::embedding.cosine_distance(&query_embedding))
            .limit(limit)
            .select((
                VectorEmbedding::as_select(),
                (1.0.into_sql::<diesel::sql_types::Double>()
                    - dsl::embedding.cosine_distance(&query_embedding)),
            ))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows
            .into_iter()
            .map(|(embedding, score)| ScoredVectorEmbedding { embedding, score })
            .collect())
    }

    async fn count_embeddings(&mut self, collection_id: Uuid) -> PgResult<i64> {
        use schema::vector_embeddings::{self, dsl};

        let count = vector_embeddings::table
            .filter(dsl::collection_id.eq(collection_id))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }

    async fn delete_embeddings(&mut self, collection_id: Uuid) -> PgResult<usize> {
        use schema::vector_embeddings::{self, dsl};

        let affected =
            diesel::delete(vector_embeddings::table.filter(dsl::collection_id.eq(collection_id)))
                .execute(self)
                .await
                .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, affected, "Deleted embeddings");
        Ok(affected)
    }
}
