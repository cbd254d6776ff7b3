use thiserror::Error;

/// Errors from the vector collection.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("qdrant: {0}")]
    Qdrant(#[from] qdrant_client::QdrantError),

    #[error("embedding has {got} dimensions, collection expects {expected}")]
    DimensionMismatch { expected: u64, got: usize },
}
