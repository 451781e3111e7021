use thiserror::Error;

use crate::support::{approximator::ApproximatorError, distribution::DistributionError};

/// Errors that can occur while using a transition model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DynamicsError {
    /// The model has no approximator implementation behind it.
    #[error("{model} transition model is not configured")]
    NotConfigured { model: &'static str },

    #[error("state has length {actual}, expected {expected}")]
    StateLength { expected: usize, actual: usize },

    #[error("action has length {actual}, expected {expected}")]
    ActionLength { expected: usize, actual: usize },

    #[error("next state has length {actual}, expected {expected}")]
    NextStateLength { expected: usize, actual: usize },

    /// A log-probability was requested from a model without a distribution.
    #[error("deterministic model has no log-probability")]
    Deterministic,

    /// A rollout needs each predicted next state to be a valid input state.
    #[error("cannot roll out: states have {states} dimensions but next states have {next_states}")]
    RolloutSpace { states: usize, next_states: usize },

    #[error("approximator failed")]
    Approximator(#[source] ApproximatorError),

    #[error("distribution failed")]
    Distribution(#[from] DistributionError),
}

impl From<ApproximatorError> for DynamicsError {
    fn from(err: ApproximatorError) -> Self {
        match err {
            ApproximatorError::NotConfigured { approximator } => {
                Self::NotConfigured { model: approximator }
            }
            other => Self::Approximator(other),
        }
    }
}
