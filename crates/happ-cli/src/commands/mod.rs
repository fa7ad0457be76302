//! CLI commands

pub mod diff;
pub mod verify;

use std::io::Read;

use crate::error::{CliError, Result};

/// Path meaning "read standard input"
pub const STDIN: &str = "-";

/// Read a file, or standard input for `-`; `what` names the input in errors
pub fn read_input(path: &str, what: &str) -> Result<String> {
    if path == STDIN {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::io_context(format!("read {} from stdin", what), e))?;
        return Ok(content);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::io_context(format!("read {} {}", what, path), e))
}

/// Reject reading both inputs from standard input
pub fn ensure_single_stdin(left: &str, right: &str) -> Result<()> {
    if left == STDIN && right == STDIN {
        return Err(CliError::usage("only one input can be read from stdin"));
    }
    Ok(())
}
