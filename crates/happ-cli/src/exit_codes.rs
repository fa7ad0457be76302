//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Differences found - `happ diff` with `--fail-on-diff` or `--quiet`
///
/// Shares its value with [`ERROR`], like `diff(1)`; a failed run is told apart
/// by its message on stderr.
pub const DIFFERENCES: i32 = 1;

/// Input error - a document could not be parsed
pub const INPUT_ERROR: i32 = 2;

/// Configuration error - invalid config file
pub const CONFIG_ERROR: i32 = 3;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Not equivalent - the generated chart renders different resources
pub const NOT_EQUIVALENT: i32 = 6;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_differences_shares_a_code() {
        assert_eq!(DIFFERENCES, ERROR);
        let distinct = [ERROR, INPUT_ERROR, CONFIG_ERROR, IO_ERROR, NOT_EQUIVALENT, USAGE_ERROR];
        for (i, code) in distinct.iter().enumerate() {
            assert!(!distinct[i + 1..].contains(code), "exit code {} reused", code);
        }
    }
}
