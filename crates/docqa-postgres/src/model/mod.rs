//! Database models for vector collections and their embeddings.

mod collection;
mod embedding;

pub use collection::{NewVectorCollection, VectorCollection};
pub use embedding::{NewVectorEmbedding, ScoredVectorEmbedding, VectorEmbedding};
