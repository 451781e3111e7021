//! Building blocks shared by the transition models.
//!
//! - [`descriptor`]: named, dimensioned state and action spaces.
//! - [`approximator`]: learnable maps from `[state; action]` to outputs.
//! - [`processor`]: vector transforms applied around an approximator.
//! - [`distribution`]: parametrized distributions over next states.
//! - [`constraint`]: validated numeric wrappers used for parameters.

pub mod approximator;
pub mod constraint;
pub mod descriptor;
pub mod distribution;
pub mod processor;
