//! Ingestion result type.

use serde::{Deserialize, Serialize};

/// Summary of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Pages with extractable text.
    pub pages: usize,
    /// Chunks embedded and stored.
    pub chunks: usize,
    /// Batches sent to the embedding provider.
    pub batches: usize,
}
