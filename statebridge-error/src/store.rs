use thiserror::Error;
use uuid::Uuid;

/// Classifies property-state store failures to avoid ad-hoc strings.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// A state record already exists for the property; callers must check
    /// with `find_state` before `create_state`.
    #[error("state already exists for property {0}")]
    StateAlreadyExists(Uuid),
    /// The state passed to `update_state` is no longer present in the store.
    #[error("state not found for property {0}")]
    StateNotFound(Uuid),
    /// Backend engine failure (connection, serialization, ...).
    #[error("state store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Stable code for structured log records.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::StateAlreadyExists(_) => "state_already_exists",
            StoreError::StateNotFound(_) => "state_not_found",
            StoreError::Backend(_) => "store_backend",
        }
    }
}
