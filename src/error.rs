//! Console-level error handling.
//!
//! Engine and backend errors keep their own types; this enum exists so
//! binaries and route handlers have one conversion target.

use thiserror::Error;

use reorg_engine::{BackendError, EngineError};

/// Main error type for the console.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
