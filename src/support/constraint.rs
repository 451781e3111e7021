//! Type-level numeric constraints.
//!
//! Model parameters such as a space dimension, a ridge penalty, or a noise
//! standard deviation only make sense within a range. Wrapping them in
//! [`Constrained<T, C>`] checks the range once, at construction, so the rest
//! of the crate can rely on it without re-validating.
//!
//! # Provided constraints
//!
//! - [`NonNegative`]: Zero or greater (e.g., a ridge penalty)
//! - [`StrictlyPositive`]: Greater than zero (e.g., a dimension or a standard deviation)
//!
//! # Extending
//!
//! Implement [`Constraint<T>`] for your own zero-sized marker type to add a
//! new invariant.

mod non_negative;
mod strictly_positive;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;

/// A numeric invariant checked at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
}

/// A value that is known to satisfy the constraint `C`.
///
/// # Example
///
/// ```
/// use twine_dynamics::support::constraint::{Constrained, StrictlyPositive};
///
/// let dim = Constrained::<usize, StrictlyPositive>::new(4).unwrap();
/// assert_eq!(dim.into_inner(), 4);
///
/// assert!(Constrained::<usize, StrictlyPositive>::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, C: Constraint<T>> Constrained<T, C> {
    /// Returns a copy of the inner value.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
