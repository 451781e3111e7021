use std::sync::Arc;

use crate::support::{
    approximator::LinearConfig,
    descriptor::StateDescriptor,
    distribution::TransitionDistribution,
    processor::Processors,
};

/// Optional construction arguments shared by the transition models.
///
/// The default is a deterministic model predicting the next value of the
/// input state space, with no processors and default fitting settings.
#[derive(Debug, Clone, Default)]
pub struct TransitionConfig {
    /// Output space. `None` means "same as the input states".
    pub next_states: Option<StateDescriptor>,

    /// Distribution to sample next states from. `None` means deterministic.
    pub distribution: Option<Arc<dyn TransitionDistribution>>,

    /// Applied to the concatenated `[state; action]` input.
    pub preprocessors: Processors,

    /// Applied to the approximator output.
    pub postprocessors: Processors,

    /// Fitting settings for linear approximators.
    pub linear: LinearConfig,
}

impl TransitionConfig {
    #[must_use]
    pub fn with_next_states(mut self, next_states: StateDescriptor) -> Self {
        self.next_states = Some(next_states);
        self
    }

    #[must_use]
    pub fn with_distribution(mut self, distribution: Arc<dyn TransitionDistribution>) -> Self {
        self.distribution = Some(distribution);
        self
    }

    #[must_use]
    pub fn with_preprocessors(mut self, preprocessors: impl Into<Processors>) -> Self {
        self.preprocessors = preprocessors.into();
        self
    }

    #[must_use]
    pub fn with_postprocessors(mut self, postprocessors: impl Into<Processors>) -> Self {
        self.postprocessors = postprocessors.into();
        self
    }

    #[must_use]
    pub fn with_linear(mut self, linear: LinearConfig) -> Self {
        self.linear = linear;
        self
    }

    /// Returns the explicit output space, or `states` if none was given.
    pub(in crate::models::dynamics) fn resolve_next_states(
        next_states: Option<StateDescriptor>,
        states: &StateDescriptor,
    ) -> StateDescriptor {
        next_states.unwrap_or_else(|| states.clone())
    }
}
