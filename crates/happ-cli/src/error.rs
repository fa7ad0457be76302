//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Invalid combination of arguments
    #[error("{message}")]
    #[diagnostic(code(happ::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// An input document could not be parsed
    #[error("{message}")]
    #[diagnostic(code(happ::cli::input))]
    Input { message: String },

    /// Configuration file could not be loaded
    #[error("Invalid config {path}: {message}")]
    #[diagnostic(
        code(happ::cli::config),
        help("see `happ --help` for the config file layout")
    )]
    Config { path: String, message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(happ::cli::io))]
    Io { message: String },

    /// A stage did not finish in time
    #[error("{stage} timed out after {elapsed}")]
    #[diagnostic(
        code(happ::cli::timeout),
        help("raise the limit with --timeout, or disable it with --timeout 0s")
    )]
    Timeout { stage: String, elapsed: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(happ::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Timeout { .. } => exit_codes::ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: None,
        }
    }

    pub fn usage_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn config(path: &Path, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create an IO error naming what was being accessed
    pub fn io_context(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", context, err),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<happ_diff::DiffError> for CliError {
    fn from(err: happ_diff::DiffError) -> Self {
        match err {
            happ_diff::DiffError::Parse { .. } => CliError::input(err.to_string()),
            happ_diff::DiffError::InvalidColorMode(_) => CliError::usage(err.to_string()),
            other => CliError::internal(other.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
