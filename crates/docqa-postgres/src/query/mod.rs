//! Repository traits for the vector store tables.
//!
//! Each repository is implemented directly on [`PgConnection`] and reached
//! through a [`PgConn`] checked out of the pool.
//!
//! [`PgConnection`]: crate::PgConnection
//! [`PgConn`]: crate::PgConn

mod collection;
mod embedding;

pub use collection::VectorCollectionRepository;
pub use embedding::VectorEmbeddingRepository;
