use nalgebra::DVector;
use tracing::debug;
use twine_core::Model;

use crate::support::{
    approximator::Unconfigured,
    descriptor::{ActionDescriptor, StateDescriptor},
};

use super::{DynamicModel, DynamicsError, StateAction, TransitionConfig, TransitionModel};

const NAME: &str = "piecewise linear";

/// Piecewise-linear transition model.
///
/// Not implemented yet. The model records its spaces and distribution so it
/// can be constructed and inspected, but every operation that needs an
/// approximator fails with [`DynamicsError::NotConfigured`].
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use twine_dynamics::{
///     models::dynamics::{DynamicsError, PiecewiseLinearTransitionModel, TransitionModel},
///     support::descriptor::{ActionDescriptor, StateDescriptor},
/// };
///
/// let model = PiecewiseLinearTransitionModel::with_defaults(
///     StateDescriptor::new("joints", 2).unwrap(),
///     ActionDescriptor::new("torques", 2).unwrap(),
/// );
///
/// let s = DVector::zeros(2);
/// assert_eq!(
///     model.mean(&s, &s),
///     Err(DynamicsError::NotConfigured { model: "piecewise linear" }),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PiecewiseLinearTransitionModel {
    dynamics: DynamicModel<Unconfigured>,
}

impl PiecewiseLinearTransitionModel {
    /// Creates the model with the same arguments as
    /// [`LinearTransitionModel::new`](super::LinearTransitionModel::new).
    ///
    /// Processors and linear fitting settings in `config` have nothing to
    /// attach to and are dropped.
    #[must_use]
    pub fn new(
        states: StateDescriptor,
        actions: ActionDescriptor,
        config: TransitionConfig,
    ) -> Self {
        let TransitionConfig {
            next_states,
            distribution,
            preprocessors,
            postprocessors,
            linear: _,
        } = config;
        let next_states = TransitionConfig::resolve_next_states(next_states, &states);
        let approximator = Unconfigured::new(NAME);

        debug!(
            approximator = approximator.name(),
            states = states.name(),
            actions = actions.name(),
            next_states = next_states.name(),
            dropped_processors = preprocessors.len() + postprocessors.len(),
            "built unconfigured transition model"
        );

        Self {
            dynamics: DynamicModel::new(
                states,
                actions,
                approximator,
                next_states,
                distribution,
            ),
        }
    }

    #[must_use]
    pub fn with_defaults(states: StateDescriptor, actions: ActionDescriptor) -> Self {
        Self::new(states, actions, TransitionConfig::default())
    }
}

impl TransitionModel for PiecewiseLinearTransitionModel {
    type Approximator = Unconfigured;

    fn dynamics(&self) -> &DynamicModel<Unconfigured> {
        &self.dynamics
    }

    fn dynamics_mut(&mut self) -> &mut DynamicModel<Unconfigured> {
        &mut self.dynamics
    }
}

impl Model for PiecewiseLinearTransitionModel {
    type Input = StateAction;
    type Output = DVector<f64>;
    type Error = DynamicsError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.dynamics.call(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        models::dynamics::{
            Transition,
            test_support::{action_space, state_space, vector},
        },
        support::{
            constraint::StrictlyPositive,
            distribution::DiagonalGaussian,
            processor::{Clip, Processor},
        },
    };

    fn not_configured() -> DynamicsError {
        DynamicsError::NotConfigured {
            model: "piecewise linear",
        }
    }

    #[test]
    fn next_states_default_to_states() {
        let s = state_space(2);
        let model = PiecewiseLinearTransitionModel::with_defaults(s.clone(), action_space(1));
        assert_eq!(model.next_states(), &s);

        let s2 = StateDescriptor::new("pose", 3).unwrap();
        let model = PiecewiseLinearTransitionModel::new(
            s,
            action_space(1),
            TransitionConfig::default().with_next_states(s2.clone()),
        );
        assert_eq!(model.next_states(), &s2);
    }

    #[test]
    fn every_operation_is_not_configured() {
        let mut model =
            PiecewiseLinearTransitionModel::with_defaults(state_space(2), action_space(1));
        let mut rng = StdRng::seed_from_u64(0);
        let s = vector(&[0.0, 1.0]);
        let a = vector(&[0.5]);

        assert_eq!(model.mean(&s, &a), Err(not_configured()));
        assert_eq!(model.predict(&s, &a, &mut rng), Err(not_configured()));
        assert_eq!(model.log_prob(&s, &a, &s), Err(not_configured()));
        assert_eq!(
            model.rollout(&s, &[a.clone(), a.clone()], &mut rng),
            Err(not_configured())
        );
        assert_eq!(
            model.fit(&[Transition {
                state: s.clone(),
                action: a.clone(),
                next_state: s.clone(),
            }]),
            Err(not_configured())
        );
        assert_eq!(model.call(&StateAction::new(s, a)), Err(not_configured()));
    }

    #[test]
    fn not_configured_wins_over_malformed_input() {
        let model =
            PiecewiseLinearTransitionModel::with_defaults(state_space(2), action_space(1));
        assert_eq!(
            model.mean(&vector(&[1.0]), &vector(&[1.0, 2.0, 3.0])),
            Err(not_configured())
        );
    }

    #[test]
    fn stochastic_configuration_is_still_not_configured() {
        let s = state_space(2);
        let noise = Arc::new(DiagonalGaussian::isotropic(
            &s,
            StrictlyPositive::new(1.0).unwrap(),
        ));
        let clip: Arc<dyn Processor> =
            Arc::new(Clip::symmetric(DVector::from_element(2, 1.0)).unwrap());

        let model = PiecewiseLinearTransitionModel::new(
            s,
            action_space(1),
            TransitionConfig::default()
                .with_distribution(noise)
                .with_postprocessors(clip),
        );
        assert!(!model.is_deterministic());

        let mut rng = StdRng::seed_from_u64(7);
        let x = vector(&[0.0, 0.0]);
        assert_eq!(
            model.predict(&x, &vector(&[0.0]), &mut rng),
            Err(not_configured())
        );
        assert_eq!(
            model.log_prob(&x, &vector(&[0.0]), &x),
            Err(not_configured())
        );
    }

    #[test]
    fn approximator_is_the_named_placeholder() {
        let model =
            PiecewiseLinearTransitionModel::with_defaults(state_space(1), action_space(1));
        assert_eq!(model.dynamics().approximator().name(), "piecewise linear");
    }

    #[test]
    fn error_message_names_the_model() {
        assert_eq!(
            not_configured().to_string(),
            "piecewise linear transition model is not configured"
        );
    }
}
