//! Error taxonomy for the column model.
//!
//! Nothing inside the model recovers from an error: a failed operation aborts
//! the call, and a failed step aborts the run, because every later step depends
//! on the one before it.

use thiserror::Error;

/// Errors raised by the column model and its configuration layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Invalid physical input: non-positive transmission, temperature,
    /// pressure or density, or a zero-thickness layer.
    #[error("domain error in {operation}: {reason}")]
    Domain {
        /// Operation that detected the problem (e.g. `"build_heights"`)
        operation: &'static str,
        /// What was wrong with the input
        reason: String,
    },

    /// Inconsistent setup detected before any stepping.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Two profiles that must line up level-for-level (or layer-for-layer) don't.
    #[error("{operation}: expected {expected} values, found {found}")]
    ShapeMismatch {
        /// Operation that received the profiles
        operation: &'static str,
        /// Required length
        expected: usize,
        /// Length actually supplied
        found: usize,
    },

    /// An error raised inside the time loop, tagged with the step that failed.
    #[error("step {step} failed: {source}")]
    StepFailed {
        /// Zero-based index of the failed step
        step: usize,
        /// Underlying error
        #[source]
        source: Box<ModelError>,
    },

    /// The model already completed its configured number of steps.
    #[error("model run already finished after {0} steps")]
    Finished(usize),

    /// Configuration file could not be read.
    #[error("failed to load configuration from {path}: {reason}")]
    ConfigLoad {
        /// File path as given by the caller
        path: String,
        /// I/O error message
        reason: String,
    },

    /// Configuration file contents are not valid JSON for `ModelConfig`.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

impl ModelError {
    /// Build a [`ModelError::Domain`].
    pub fn domain(operation: &'static str, reason: impl Into<String>) -> Self {
        ModelError::Domain {
            operation,
            reason: reason.into(),
        }
    }

    /// Build a [`ModelError::Configuration`].
    pub fn configuration(reason: impl Into<String>) -> Self {
        ModelError::Configuration(reason.into())
    }

    /// Wrap an error raised while executing `step`.
    pub fn at_step(self, step: usize) -> Self {
        ModelError::StepFailed {
            step,
            source: Box::new(self),
        }
    }

    /// Step index attached to this error, if it was raised inside the time loop.
    pub fn step(&self) -> Option<usize> {
        match self {
            ModelError::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// True for [`ModelError::Domain`], looking through a step wrapper.
    pub fn is_domain(&self) -> bool {
        match self {
            ModelError::Domain { .. } => true,
            ModelError::StepFailed { source, .. } => source.is_domain(),
            _ => false,
        }
    }
}

/// Convenience type for `Result<T, ModelError>`.
pub type ModelResult<T> = Result<T, ModelError>;

/// Check that a profile has the length an operation requires.
pub(crate) fn ensure_len(operation: &'static str, expected: usize, found: usize) -> ModelResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch {
            operation,
            expected,
            found,
        })
    }
}
