use thiserror::Error;

/// Errors surfaced by the user store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A single-row lookup matched nothing.
    #[error("user not found")]
    NotFound,

    /// Connection failure, constraint violation, bad statement or decode failure.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
