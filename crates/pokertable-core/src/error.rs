//! Error types for the table state core

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unrecognised card label '{0}'")]
    InvalidCard(String),

    #[error("invalid slot key '{key}' in {file}")]
    InvalidSlotKey { key: String, file: &'static str },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TableError>;
