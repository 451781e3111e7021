//! Probability distributions over next states.
//!
//! When a dynamic model is given a distribution, the approximator output is
//! read as the distribution's parameters instead of as the next state
//! itself, and prediction draws a sample.

mod gaussian;

use std::fmt;

use nalgebra::DVector;
use rand::RngCore;
use thiserror::Error;

pub use gaussian::DiagonalGaussian;

/// Errors that can occur while building or evaluating a distribution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("{distribution} expects {expected} parameters, got {actual}")]
    ParameterCount {
        distribution: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{distribution} is defined over {expected} dimensions, got a value of length {actual}")]
    ValueLength {
        distribution: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {distribution} parameter: {context}")]
    InvalidParameter {
        distribution: &'static str,
        context: String,
    },
}

/// A conditional distribution `p(s' | params)` over next states.
///
/// `params` is the post-processed approximator output for one `(s, a)`
/// pair, which always has the next-state dimension. Families are therefore
/// located by `params` and carry any spread parameters themselves.
pub trait TransitionDistribution: fmt::Debug + Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Dimension of the sampled next state.
    fn dim(&self) -> usize;

    /// The expected next state under `params`.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] if `params` has the wrong length.
    fn mean(&self, params: &DVector<f64>) -> Result<DVector<f64>, DistributionError>;

    /// Draws one next state.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] if `params` has the wrong length.
    fn sample(
        &self,
        params: &DVector<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<DVector<f64>, DistributionError>;

    /// Log density of `value` under `params`.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] if `params` or `value` has the wrong length.
    fn log_prob(&self, params: &DVector<f64>, value: &DVector<f64>)
    -> Result<f64, DistributionError>;
}
