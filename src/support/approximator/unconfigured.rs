use nalgebra::DVector;

use super::{Approximator, ApproximatorError, FitReport};

/// Placeholder for an approximator family that has no implementation yet.
///
/// Every operation fails with [`ApproximatorError::NotConfigured`], so a
/// model built on top of it is constructible but unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unconfigured {
    approximator: &'static str,
}

impl Unconfigured {
    /// Creates a placeholder for the named approximator family.
    #[must_use]
    pub const fn new(approximator: &'static str) -> Self {
        Self { approximator }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.approximator
    }

    fn error(&self) -> ApproximatorError {
        ApproximatorError::NotConfigured {
            approximator: self.approximator,
        }
    }
}

impl Approximator for Unconfigured {
    fn ensure_configured(&self) -> Result<(), ApproximatorError> {
        Err(self.error())
    }

    fn predict(&self, _input: &DVector<f64>) -> Result<DVector<f64>, ApproximatorError> {
        Err(self.error())
    }

    fn fit(
        &mut self,
        _inputs: &[DVector<f64>],
        _targets: &[DVector<f64>],
    ) -> Result<FitReport, ApproximatorError> {
        Err(self.error())
    }
}
