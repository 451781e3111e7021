//! State and action descriptors.
//!
//! A descriptor names a vector space and fixes its dimension, optionally
//! with per-component bounds. Models only reference descriptors; they never
//! mutate them.
//!
//! [`StateDescriptor`] and [`ActionDescriptor`] share one implementation,
//! [`Descriptor<K>`], and differ only in a zero-sized kind marker so that a
//! state space can't be passed where an action space is expected.

use std::{fmt, marker::PhantomData};

use nalgebra::DVector;
use thiserror::Error;

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};

/// Kind marker for state spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State;

/// Kind marker for action spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action;

pub type StateDescriptor = Descriptor<State>;
pub type ActionDescriptor = Descriptor<Action>;

/// Errors that can occur while building a descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescriptorError {
    #[error("descriptor name must not be empty")]
    EmptyName,
    #[error("invalid dimension: {0}")]
    Dimension(#[from] ConstraintError),
    #[error("bounds have length {actual}, expected {expected}")]
    BoundsLength { expected: usize, actual: usize },
    #[error("lower bound exceeds upper bound at index {index}")]
    InvertedBounds { index: usize },
}

/// Component-wise `[lower, upper]` box bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub lower: DVector<f64>,
    pub upper: DVector<f64>,
}

impl Bounds {
    /// Returns true if every component of `x` lies within the bounds.
    ///
    /// Returns false if `x` has the wrong length.
    #[must_use]
    pub fn contains(&self, x: &DVector<f64>) -> bool {
        x.len() == self.lower.len()
            && x
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

/// A named vector space of fixed dimension.
#[derive(Clone, PartialEq)]
pub struct Descriptor<K> {
    name: String,
    dim: Constrained<usize, StrictlyPositive>,
    bounds: Option<Bounds>,
    _kind: PhantomData<K>,
}

impl<K> Descriptor<K> {
    /// Creates an unbounded descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] if `name` is empty or `dim` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use twine_dynamics::support::descriptor::StateDescriptor;
    ///
    /// let joints = StateDescriptor::new("joint_positions", 7).unwrap();
    /// assert_eq!(joints.dim(), 7);
    /// assert!(StateDescriptor::new("empty", 0).is_err());
    /// ```
    pub fn new(name: impl Into<String>, dim: usize) -> Result<Self, DescriptorError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        Ok(Self {
            name,
            dim: StrictlyPositive::new(dim)?,
            bounds: None,
            _kind: PhantomData,
        })
    }

    /// Attaches component-wise bounds.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] if a bound has the wrong length or if any
    /// lower bound exceeds its upper bound.
    pub fn with_bounds(
        mut self,
        lower: DVector<f64>,
        upper: DVector<f64>,
    ) -> Result<Self, DescriptorError> {
        let expected = self.dim();
        for actual in [lower.len(), upper.len()] {
            if actual != expected {
                return Err(DescriptorError::BoundsLength { expected, actual });
            }
        }
        if let Some(index) = lower.iter().zip(upper.iter()).position(|(lo, hi)| lo > hi) {
            return Err(DescriptorError::InvertedBounds { index });
        }
        self.bounds = Some(Bounds { lower, upper });
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim.get()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    /// Returns the kind-erased signature used to declare approximator inputs and outputs.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            dim: self.dim,
        }
    }
}

impl<K> fmt::Debug for Descriptor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field(
                "kind",
                &std::any::type_name::<K>().rsplit("::").next().unwrap_or_default(),
            )
            .field("name", &self.name)
            .field("dim", &self.dim())
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// The name and dimension of one approximator input or output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    name: String,
    dim: Constrained<usize, StrictlyPositive>,
}

impl Signature {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim.get()
    }

    /// Total dimension of a concatenation of signatures.
    ///
    /// Returns `None` for an empty slice.
    pub(crate) fn total_dim(signatures: &[Signature]) -> Option<usize> {
        signatures
            .iter()
            .map(|s| s.dim)
            .reduce(|a, b| a + b)
            .map(Constrained::into_inner)
    }
}
