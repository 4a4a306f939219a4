pub mod exchange;
pub mod store;

use anyhow::Error as AnyhowError;
use config::ConfigError;
use exchange::ExchangeError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use store::StoreError;
use thiserror::Error;

pub type BridgeResult<T, E = BridgeError> = Result<T, E>;
pub type ExchangeResult<T, E = ExchangeError> = Result<T, E>;
pub type StoreResult<T, E = StoreError> = Result<T, E>;

/// Top-level error for the statebridge workspace.
///
/// Domain-specific kinds live in their own enums (`ExchangeError`,
/// `StoreError`) and are wrapped here for callers that only need a single
/// error surface (binaries, wiring code).
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    Exchange(#[from] ExchangeError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Msg(String),
}

impl From<String> for BridgeError {
    #[inline]
    fn from(e: String) -> Self {
        BridgeError::Msg(e)
    }
}

impl From<&str> for BridgeError {
    #[inline]
    fn from(e: &str) -> Self {
        BridgeError::Msg(e.to_string())
    }
}
