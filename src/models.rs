//! Public Twine models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Organization
//!
//! Models are grouped by domain. Currently only [`dynamics`] (transition
//! models `p(s' | s, a)`) exists.
//!
//! # Model structure
//!
//! Each family of models shares an internal base type where the actual
//! computation lives. Public model types are thin wrappers that configure
//! that base and implement [`twine_core::Model`] by delegating to it.

pub mod dynamics;
