use std::cmp::Ordering;

use nalgebra::DVector;

use crate::support::descriptor::Bounds;

use super::{Processor, ProcessorError, check_len, check_pair};

const NAME: &str = "clip";

/// Clamps each component into `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    lower: DVector<f64>,
    upper: DVector<f64>,
}

impl Clip {
    /// # Errors
    ///
    /// Returns [`ProcessorError`] if the lengths differ or any `lower`
    /// exceeds its `upper`.
    pub fn new(lower: DVector<f64>, upper: DVector<f64>) -> Result<Self, ProcessorError> {
        check_pair(NAME, &lower, &upper)?;
        if let Some(index) = lower
            .iter()
            .zip(upper.iter())
            .position(|(lo, hi)| lo.partial_cmp(hi).is_none_or(Ordering::is_gt))
        {
            return Err(ProcessorError::InvalidParameter {
                processor: NAME,
                index,
                context: format!("lower {} exceeds upper {}", lower[index], upper[index]),
            });
        }
        Ok(Self { lower, upper })
    }

    /// Clips into `[-limit, limit]`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] if any limit is negative.
    pub fn symmetric(limit: DVector<f64>) -> Result<Self, ProcessorError> {
        Self::new(-limit.clone(), limit)
    }

    /// Clips into descriptor bounds.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from [`Clip::new`].
    pub fn from_bounds(bounds: &Bounds) -> Result<Self, ProcessorError> {
        Self::new(bounds.lower.clone(), bounds.upper.clone())
    }
}

impl Processor for Clip {
    fn name(&self) -> &'static str {
        NAME
    }

    fn process(&self, x: DVector<f64>) -> Result<DVector<f64>, ProcessorError> {
        check_len(NAME, self.lower.len(), &x)?;
        Ok(x.zip_zip_map(&self.lower, &self.upper, |v, lo, hi| v.clamp(lo, hi)))
    }
}
