//! # Twine Dynamics
//!
//! Parametrized transition (dynamics) models for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! A transition model predicts the next state of an environment from its
//! current state and an action, either as a point estimate or by sampling a
//! distribution over next states.
//!
//! ## Crate layout
//!
//! - [`models`]: Transition models, each a [`twine_core::Model`].
//! - [`support`]: Descriptors, approximators, processors, and distributions
//!   the models are assembled from.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful
//! on their own, but their APIs are not stable. Breaking changes may occur
//! as needed.

pub mod models;
pub mod support;
