use std::cmp::Ordering;

use nalgebra::DVector;

use crate::support::descriptor::Bounds;

use super::{Processor, ProcessorError, check_len, check_pair};

const NAME: &str = "normalize";

/// Min-max scaling of each component from `[lower, upper]` onto `[0, 1]`.
///
/// Values outside the range map outside `[0, 1]`; chain a [`super::Clip`]
/// if they must be confined.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalize {
    lower: DVector<f64>,
    range: DVector<f64>,
}

impl Normalize {
    /// Creates a normalizer for the given component-wise range.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] if the lengths differ or any `upper` is not
    /// strictly greater than its `lower`.
    pub fn new(lower: DVector<f64>, upper: DVector<f64>) -> Result<Self, ProcessorError> {
        check_pair(NAME, &lower, &upper)?;
        let range = &upper - &lower;
        if let Some(index) = range
            .iter()
            .position(|r| r.partial_cmp(&0.0).is_none_or(Ordering::is_le))
        {
            return Err(ProcessorError::InvalidParameter {
                processor: NAME,
                index,
                context: format!("empty range [{}, {}]", lower[index], upper[index]),
            });
        }
        Ok(Self { lower, range })
    }

    /// Creates a normalizer from descriptor bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] if any bound has zero width.
    pub fn from_bounds(bounds: &Bounds) -> Result<Self, ProcessorError> {
        Self::new(bounds.lower.clone(), bounds.upper.clone())
    }
}

impl Processor for Normalize {
    fn name(&self) -> &'static str {
        NAME
    }

    fn process(&self, x: DVector<f64>) -> Result<DVector<f64>, ProcessorError> {
        check_len(NAME, self.lower.len(), &x)?;
        Ok((x - &self.lower).component_div(&self.range))
    }
}
