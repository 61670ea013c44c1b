//! Vector collection repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewVectorCollection, VectorCollection};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for vector collection database operations.
pub trait VectorCollectionRepository {
    /// Returns the collection with the given name, creating it when missing.
    fn find_or_create_collection(
        &mut self,
        name: &str,
    ) -> impl Future<Output = PgResult<VectorCollection>> + Send;
}

impl VectorCollectionRepository for PgConnection {
    async fn find_or_create_collection(&mut self, name: &str) -> PgResult<VectorCollection> {
        use schema::vector_collections::{self, dsl};

        let inserted = diesel::insert_into(vector_collections::table)
            .values(&NewVectorCollection::new(name))
            .on_conflict(dsl::name)
            .do_nothing()
            .execute(self)
            .await
            .map_err(PgError::from)?;

        if inserted > 0 {
            tracing::debug!(target: TRACING_TARGET_QUERY, collection = name, "Created vector collection");
        }

        let collection = vector_collections::table
            .filter(dsl::name.eq(name))
            .select(VectorCollection::as_select())
            .first(self)
            .await
            .map_err(PgError::from)?;

        Ok(collection)
    }
}
