//! Error types for zone geometry

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("invalid zone rectangle '{0}' (expected x,y,w,h with positive size)")]
    InvalidRect(String),

    #[error("zone layout has no player or board zones")]
    EmptyLayout,
}
