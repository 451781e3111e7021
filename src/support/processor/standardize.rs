use nalgebra::DVector;

use crate::support::constraint::StrictlyPositive;

use super::{Processor, ProcessorError, check_len, check_pair};

const NAME: &str = "standardize";

/// Maps each component to `(x - mean) / std`.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardize {
    mean: DVector<f64>,
    std: DVector<f64>,
}

impl Standardize {
    /// Creates a standardizer from per-component means and standard deviations.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] if the lengths differ or any standard
    /// deviation is not strictly positive.
    pub fn new(mean: DVector<f64>, std: DVector<f64>) -> Result<Self, ProcessorError> {
        check_pair(NAME, &mean, &std)?;
        for (index, s) in std.iter().enumerate() {
            StrictlyPositive::new(*s).map_err(|e| ProcessorError::InvalidParameter {
                processor: NAME,
                index,
                context: format!("std {s}: {e}"),
            })?;
        }
        Ok(Self { mean, std })
    }

    /// Estimates the mean and (population) standard deviation from samples.
    ///
    /// Components with zero spread get a standard deviation of one so they
    /// pass through centered but unscaled.
    ///
    /// Returns `None` if `samples` is empty or the samples differ in length.
    #[must_use]
    pub fn fit(samples: &[DVector<f64>]) -> Option<Self> {
        let first = samples.first()?;
        let dim = first.len();
        if samples.iter().any(|x| x.len() != dim) {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = samples.len() as f64;
        let mean = samples
            .iter()
            .fold(DVector::<f64>::zeros(dim), |acc, x| acc + x)
            / n;
        let var = samples.iter().fold(DVector::<f64>::zeros(dim), |acc, x| {
            let d = x - &mean;
            acc + d.component_mul(&d)
        }) / n;
        let std = var.map(|v| if v > 0.0 { v.sqrt() } else { 1.0 });

        Some(Self { mean, std })
    }

    #[must_use]
    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    #[must_use]
    pub fn std(&self) -> &DVector<f64> {
        &self.std
    }
}

impl Processor for Standardize {
    fn name(&self) -> &'static str {
        NAME
    }

    fn process(&self, x: DVector<f64>) -> Result<DVector<f64>, ProcessorError> {
        check_len(NAME, self.mean.len(), &x)?;
        Ok((x - &self.mean).component_div(&self.std))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_positive_std() {
        let err = Standardize::new(
            DVector::from_vec(vec![0.0, 0.0]),
            DVector::from_vec(vec![1.0, 0.0]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::InvalidParameter { index: 1, .. }
        ));
    }

    #[test]
    fn fit_centers_and_scales() {
        let samples = vec![
            DVector::from_vec(vec![1.0, 5.0]),
            DVector::from_vec(vec![3.0, 5.0]),
        ];
        let s = Standardize::fit(&samples).unwrap();

        assert_relative_eq!(s.mean()[0], 2.0);
        assert_relative_eq!(s.std()[0], 1.0);
        // Constant component keeps unit scale.
        assert_relative_eq!(s.std()[1], 1.0);

        let y = s.process(DVector::from_vec(vec![3.0, 6.0])).unwrap();
        assert_relative_eq!(y[0], 1.0);
        assert_relative_eq!(y[1], 1.0);
    }

    #[test]
    fn fit_rejects_ragged_samples() {
        let samples = vec![DVector::from_vec(vec![1.0]), DVector::from_vec(vec![1.0, 2.0])];
        assert!(Standardize::fit(&samples).is_none());
        assert!(Standardize::fit(&[]).is_none());
    }
}
