//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document {index} is not a mapping")]
    NotADocument { index: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
