//! Injected error reporting.
//!
//! A round never decides on its own whether a recoverable error should be
//! logged, panic, or fail a test. The driver picks an [`ErrorReporter`] and
//! passes it in.

use crate::RoundError;
use parking_lot::Mutex;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Receives recoverable errors raised by a round.
pub trait ErrorReporter: Send + Sync {
    /// Report an error. Must not assume the caller will stop.
    fn report(&self, error: &RoundError);
}

/// Logs reported errors and carries on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &RoundError) {
        warn!(error = %error, class = ?error.class(), "Round error reported");
    }
}

/// Panics on the first reported error.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl ErrorReporter for PanicReporter {
    fn report(&self, error: &RoundError) {
        panic!("round error: {}", error);
    }
}

/// Fails the current test on the first reported error.
///
/// Unlike [`PanicReporter`] the message names the failure as a test
/// failure, so it reads correctly in test output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestFailReporter;

impl ErrorReporter for TestFailReporter {
    fn report(&self, error: &RoundError) {
        panic!("test failed with round error: {}", error);
    }
}

/// Records reported errors for later assertions.
///
/// Hand the same `Arc` to the round and keep a clone to inspect.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<String>>,
}

impl CollectingReporter {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of every error reported so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    /// Number of errors reported so far.
    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    /// Check if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, error: &RoundError) {
        self.errors.lock().push(error.to_string());
    }
}

/// How recoverable errors are surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Log and continue.
    #[default]
    Production,
    /// Panic immediately.
    Debug,
    /// Fail the running test.
    Testing,
}

impl ErrorMode {
    /// Build the reporter for this mode.
    pub fn reporter(self) -> Arc<dyn ErrorReporter> {
        match self {
            ErrorMode::Production => Arc::new(TracingReporter),
            ErrorMode::Debug => Arc::new(PanicReporter),
            ErrorMode::Testing => Arc::new(TestFailReporter),
        }
    }
}

impl FromStr for ErrorMode {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "production" => Ok(ErrorMode::Production),
            "debug" => Ok(ErrorMode::Debug),
            "testing" => Ok(ErrorMode::Testing),
            other => Err(RoundError::UnknownErrorMode(other.to_string())),
        }
    }
}
