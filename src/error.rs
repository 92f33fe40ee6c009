//! Error types.

use thiserror::Error;

/// A fatal error from one of the optimizer operations.
///
/// Only invalid parameters are fatal; data-quality problems are reported in
/// the result instead.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// A parameter lies outside its accepted range.
    #[error("parameter `{name}` out of range: got {value}, expected {expected}")]
    ParameterOutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Offending value, rendered.
        value: String,
        /// Accepted range, human readable.
        expected: &'static str,
    },
    /// The configuration document could not be parsed.
    #[error("invalid optimizer configuration")]
    InvalidConfig(#[from] serde_json::Error),
}

impl OptimizeError {
    pub(crate) fn out_of_range(
        name: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        OptimizeError::ParameterOutOfRange {
            name,
            value: value.to_string(),
            expected,
        }
    }

    /// Diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            OptimizeError::ParameterOutOfRange { .. } => "PARAMETER_OUT_OF_RANGE",
            OptimizeError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// A failure reported by an external collaborator (geocoder, road snapper).
///
/// Never fatal: the core retries, then falls back to pure geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorError {
    /// The service could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    /// The call did not complete in time.
    #[error("collaborator call timed out")]
    Timeout,
    /// The service answered with something unusable.
    #[error("invalid collaborator response: {0}")]
    InvalidResponse(String),
    /// Skipped: the collaborator failed repeatedly earlier in this run.
    #[error("collaborator disabled after repeated failures")]
    CircuitOpen,
}

impl CollaboratorError {
    /// Returns `true` if repeating the call may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            CollaboratorError::Unavailable(_) | CollaboratorError::Timeout
        )
    }
}
