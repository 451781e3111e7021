//! Function approximators.
//!
//! An [`Approximator`] is a parametrized map from a flat input vector to a
//! flat output vector that can be fit from data. Dynamic models own exactly
//! one approximator and feed it the concatenated `[state; action]` vector.

mod linear;
mod unconfigured;

use nalgebra::DVector;
use thiserror::Error;

use crate::support::processor::ProcessorError;

pub use linear::{LinearApproximator, LinearConfig};
pub use unconfigured::Unconfigured;

/// Errors that can occur while fitting or evaluating an approximator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApproximatorError {
    /// An input vector has the wrong length.
    #[error("input has length {actual}, expected {expected}")]
    InputLength { expected: usize, actual: usize },

    /// A target vector has the wrong length.
    #[error("target has length {actual}, expected {expected}")]
    TargetLength { expected: usize, actual: usize },

    /// Inputs and targets were given in different numbers.
    #[error("got {inputs} inputs but {targets} targets")]
    SampleCount { inputs: usize, targets: usize },

    /// No samples were given to fit.
    #[error("cannot fit without samples")]
    EmptyData,

    /// Explicit parameters don't match the declared shape.
    #[error("parameter shape mismatch: {context}")]
    ParameterShape { context: String },

    /// A pre- or post-processor rejected a vector.
    #[error("processor failed")]
    Processor(#[from] ProcessorError),

    /// A fitting sample contains NaN or an infinite value.
    #[error("sample {sample} has a non-finite {context}")]
    NonFinite { sample: usize, context: &'static str },

    /// The least-squares solve failed.
    #[error("least-squares solve failed: {context}")]
    Solve { context: &'static str },

    /// The approximator has no implementation behind it.
    #[error("{approximator} approximator is not configured")]
    NotConfigured { approximator: &'static str },
}

/// Summary of one call to [`Approximator::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    /// Number of samples used.
    pub samples: usize,

    /// Root-mean-square training residual over all output components.
    pub rmse: f64,
}

/// A learnable input-to-output map.
pub trait Approximator {
    /// Fails fast if there is no usable implementation behind this approximator.
    ///
    /// # Errors
    ///
    /// Returns [`ApproximatorError::NotConfigured`] for placeholder approximators.
    fn ensure_configured(&self) -> Result<(), ApproximatorError> {
        Ok(())
    }

    /// Evaluates the approximator at `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ApproximatorError`] if `input` is malformed or a processor fails.
    fn predict(&self, input: &DVector<f64>) -> Result<DVector<f64>, ApproximatorError>;

    /// Fits parameters so that `predict(inputs[i])` approximates `targets[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`ApproximatorError`] on malformed data or a failed solve.
    fn fit(
        &mut self,
        inputs: &[DVector<f64>],
        targets: &[DVector<f64>],
    ) -> Result<FitReport, ApproximatorError>;
}
