//! Deadline for long-running stages
//!
//! The work runs on a blocking worker and is raced against a timer. On expiry
//! the worker is left to finish in the background and its result is dropped.

use humantime_serde::re::humantime;
use std::time::Duration;
use tracing::debug;

use crate::error::{CliError, Result};

/// Run `work`, failing with `"<stage> timed out after <limit>"` past the limit
///
/// A zero limit runs the work inline without any deadline.
pub fn run_with_timeout<T, F>(stage: &str, limit: Duration, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    if limit.is_zero() {
        return Ok(work());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| CliError::internal(format!("start {} runtime: {}", stage, e)))?;

    let outcome = runtime.block_on(async {
        tokio::time::timeout(limit, tokio::task::spawn_blocking(work)).await
    });
    // Do not wait for a worker that outlived the deadline
    runtime.shutdown_background();

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join)) => Err(CliError::internal(format!("{} failed: {}", stage, join))),
        Err(_) => {
            debug!(stage, ?limit, "stage deadline expired");
            Err(CliError::Timeout {
                stage: stage.to_string(),
                elapsed: humantime::format_duration(limit).to_string(),
            })
        }
    }
}

/// Parse a duration such as `90s`, `5m` or `1h 30m`
pub fn parse_duration(value: &str) -> std::result::Result<Duration, humantime::DurationError> {
    humantime::parse_duration(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_work_completes() {
        let value = run_with_timeout("compare", Duration::from_secs(5), || 21 * 2).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_zero_limit_runs_inline() {
        let value = run_with_timeout("compare", Duration::ZERO, || "done").unwrap();
        assert_eq!(value, "done");
    }

    #[test]
    fn test_slow_work_times_out() {
        let err = run_with_timeout("verify equivalence", Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(500));
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "verify equivalence timed out after 20ms");
    }

    #[test]
    fn test_panicking_work_is_internal_error() {
        let err = run_with_timeout("compare", Duration::from_secs(5), || -> u8 { panic!("boom") })
            .unwrap_err();
        assert!(matches!(err, CliError::Internal { .. }));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration(" 0s ").unwrap(), Duration::ZERO);
        assert!(parse_duration("soon").is_err());
    }
}
