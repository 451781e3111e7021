//! Transition (dynamics) models.
//!
//! A transition model maps a `(state, action)` pair to the next state,
//! either as a point estimate or, when given a
//! [`TransitionDistribution`](crate::support::distribution::TransitionDistribution),
//! by sampling `p(s' | s, a)`.
//!
//! - [`LinearTransitionModel`]: a linear approximator over `[state; action]`.
//! - [`PiecewiseLinearTransitionModel`]: not implemented yet; constructible,
//!   but every operation fails with [`DynamicsError::NotConfigured`].
//!
//! Both wrap the shared [`DynamicModel`] base and expose it through the
//! [`TransitionModel`] trait.

mod base;
mod linear;
mod piecewise_linear;

#[cfg(test)]
mod test_support;

pub use base::{
    DynamicModel, DynamicsError, StateAction, Transition, TransitionConfig, TransitionModel,
};
pub use linear::LinearTransitionModel;
pub use piecewise_linear::PiecewiseLinearTransitionModel;
