//! Diff engine error types

use happ_core::CoreError;
use thiserror::Error;

/// Which input a failure relates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Generated,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Generated => write!(f, "generated"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("parse {side} yaml: {source}")]
    Parse {
        side: Side,
        #[source]
        source: CoreError,
    },

    #[error("invalid color mode '{0}' (expected auto, always or never)")]
    InvalidColorMode(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DiffError {
    pub fn parse(side: Side, source: CoreError) -> Self {
        DiffError::Parse { side, source }
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;
