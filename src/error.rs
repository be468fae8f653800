use thiserror::Error;

/// Failures the storage layer can surface. The pure metrics functions never
/// return these; they fall back to neutral values instead.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl LedgerError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        LedgerError::NotFound { entity, id }
    }
}
