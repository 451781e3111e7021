//! Pre- and post-processing of approximator inputs and outputs.
//!
//! A [`Processor`] is a fixed vector-to-vector transformation such as
//! standardization or clipping. Processors are shared: a [`Processors`]
//! chain holds `Arc`s, so the same processor object can be handed to several
//! approximators and later compared by identity.

mod clip;
mod normalize;
mod standardize;

use std::{fmt, sync::Arc};

use nalgebra::DVector;
use thiserror::Error;

pub use clip::Clip;
pub use normalize::Normalize;
pub use standardize::Standardize;

/// Errors that can occur while building or applying a processor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessorError {
    #[error("{processor} expects a vector of length {expected}, got {actual}")]
    DimensionMismatch {
        processor: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{processor} parameters have mismatched lengths: {left} and {right}")]
    ParameterLength {
        processor: &'static str,
        left: usize,
        right: usize,
    },

    #[error("invalid {processor} parameter at index {index}: {context}")]
    InvalidParameter {
        processor: &'static str,
        index: usize,
        context: String,
    },
}

/// A transformation applied to a vector before or after approximation.
pub trait Processor: fmt::Debug + Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Applies the transformation.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] if `x` is incompatible with this processor.
    fn process(&self, x: DVector<f64>) -> Result<DVector<f64>, ProcessorError>;
}

/// An ordered, possibly empty, chain of shared processors.
///
/// Build one from a single processor or from many:
///
/// ```
/// use std::sync::Arc;
///
/// use nalgebra::DVector;
/// use twine_dynamics::support::processor::{Clip, Processor, Processors};
///
/// let clip: Arc<dyn Processor> = Arc::new(Clip::symmetric(DVector::from_element(2, 1.0)).unwrap());
///
/// let one = Processors::from(Arc::clone(&clip));
/// let many = Processors::from(vec![Arc::clone(&clip), clip]);
/// assert_eq!(one.len(), 1);
/// assert_eq!(many.len(), 2);
/// assert!(Processors::default().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Processors(Vec<Arc<dyn Processor>>);

impl Processors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a processor to the end of the chain.
    #[must_use]
    pub fn then(mut self, processor: Arc<dyn Processor>) -> Self {
        self.0.push(processor);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Processor>> {
        self.0.iter()
    }

    /// Runs `x` through every processor in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProcessorError`] raised by the chain.
    pub fn apply(&self, x: DVector<f64>) -> Result<DVector<f64>, ProcessorError> {
        self.0.iter().try_fold(x, |x, p| p.process(x))
    }
}

impl From<Arc<dyn Processor>> for Processors {
    fn from(processor: Arc<dyn Processor>) -> Self {
        Self(vec![processor])
    }
}

impl From<Vec<Arc<dyn Processor>>> for Processors {
    fn from(processors: Vec<Arc<dyn Processor>>) -> Self {
        Self(processors)
    }
}

impl FromIterator<Arc<dyn Processor>> for Processors {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Processor>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Checks that `x` has the length a processor was configured for.
fn check_len(
    processor: &'static str,
    expected: usize,
    x: &DVector<f64>,
) -> Result<(), ProcessorError> {
    if x.len() == expected {
        Ok(())
    } else {
        Err(ProcessorError::DimensionMismatch {
            processor,
            expected,
            actual: x.len(),
        })
    }
}

/// Checks that two parameter vectors have the same length.
fn check_pair(
    processor: &'static str,
    left: &DVector<f64>,
    right: &DVector<f64>,
) -> Result<(), ProcessorError> {
    if left.len() == right.len() {
        Ok(())
    } else {
        Err(ProcessorError::ParameterLength {
            processor,
            left: left.len(),
            right: right.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn chain_applies_in_order() {
        let standardize: Arc<dyn Processor> = Arc::new(
            Standardize::new(DVector::from_vec(vec![1.0]), DVector::from_vec(vec![2.0])).unwrap(),
        );
        let clip: Arc<dyn Processor> =
            Arc::new(Clip::symmetric(DVector::from_vec(vec![1.0])).unwrap());

        let chain = Processors::from(vec![standardize, clip]);

        // (7 - 1) / 2 = 3, then clipped to 1.
        let y = chain.apply(DVector::from_vec(vec![7.0])).unwrap();
        assert_relative_eq!(y[0], 1.0);

        // (0 - 1) / 2 = -0.5, inside the clip range.
        let y = chain.apply(DVector::from_vec(vec![0.0])).unwrap();
        assert_relative_eq!(y[0], -0.5);
    }

    #[test]
    fn empty_chain_is_identity() {
        let x = DVector::from_vec(vec![1.0, -2.0, 3.0]);
        assert_eq!(Processors::new().apply(x.clone()).unwrap(), x);
    }

    #[test]
    fn chain_reports_first_error() {
        let clip: Arc<dyn Processor> =
            Arc::new(Clip::symmetric(DVector::from_vec(vec![1.0, 1.0])).unwrap());
        let err = Processors::from(clip)
            .apply(DVector::from_vec(vec![0.0]))
            .unwrap_err();
        assert_eq!(
            err,
            ProcessorError::DimensionMismatch {
                processor: "clip",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn then_appends_and_collect_preserves_order() {
        let shift: Arc<dyn Processor> = Arc::new(
            Standardize::new(DVector::from_vec(vec![1.0]), DVector::from_vec(vec![1.0])).unwrap(),
        );
        let halve: Arc<dyn Processor> = Arc::new(
            Standardize::new(DVector::from_vec(vec![0.0]), DVector::from_vec(vec![2.0])).unwrap(),
        );

        let chained = Processors::new()
            .then(Arc::clone(&shift))
            .then(Arc::clone(&halve));
        assert_eq!(chained.len(), 2);

        // (5 - 1) / 2 = 2, whereas the reverse order gives 5 / 2 - 1 = 1.5.
        let x = DVector::from_vec(vec![5.0]);
        assert_relative_eq!(chained.apply(x.clone()).unwrap()[0], 2.0);

        let collected: Processors = [halve, shift].into_iter().collect();
        assert_relative_eq!(collected.apply(x).unwrap()[0], 1.5);
    }
}
