use crate::support::constraint::{Constrained, NonNegative};

/// Fitting configuration for a [`super::LinearApproximator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearConfig {
    /// L2 penalty on the weights (never on the bias).
    ///
    /// Zero gives ordinary least squares, with the minimum-norm solution
    /// when the data don't determine the weights uniquely.
    pub ridge: Constrained<f64, NonNegative>,

    /// Whether to fit an intercept term.
    pub fit_bias: bool,

    /// Singular values below `rcond` times the largest one are treated as zero.
    pub rcond: Constrained<f64, NonNegative>,
}

const RCOND: f64 = 1e-10;

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            ridge: NonNegative::zero(),
            fit_bias: true,
            rcond: NonNegative::new(RCOND).unwrap_or_else(|_| NonNegative::zero()),
        }
    }
}

impl LinearConfig {
    /// Returns this configuration with the given ridge penalty.
    #[must_use]
    pub fn with_ridge(mut self, ridge: Constrained<f64, NonNegative>) -> Self {
        self.ridge = ridge;
        self
    }

    /// Returns this configuration with the given singular-value cutoff.
    #[must_use]
    pub fn with_rcond(mut self, rcond: Constrained<f64, NonNegative>) -> Self {
        self.rcond = rcond;
        self
    }

    /// Returns this configuration with the intercept term disabled.
    #[must_use]
    pub fn without_bias(mut self) -> Self {
        self.fit_bias = false;
        self
    }
}
