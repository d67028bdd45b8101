//! Top-level error type for the artist release pipeline
//!
//! Each crate defines its own `thiserror` enum for its abstract error
//! kind (Config, Transient, Content, ExternalTool, State, Timeout,
//! Unexpected — see spec §7) and converts into this one at the crate
//! boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("evolution error: {0}")]
    Evolution(String),

    #[error("video selection error: {0}")]
    Video(String),

    #[error("supervisor error: {0}")]
    Supervisor(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
