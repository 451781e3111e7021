use nalgebra::DVector;
use tracing::debug;
use twine_core::Model;

use crate::support::{
    approximator::LinearApproximator,
    descriptor::{ActionDescriptor, StateDescriptor},
};

use super::{DynamicModel, DynamicsError, StateAction, TransitionConfig, TransitionModel};

/// Linear transition model `s' = W [s; a] + b`.
///
/// Easy to fit and cheap to evaluate, but limited to dynamics that are
/// (close to) affine over the whole state-action space.
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use rand::{SeedableRng, rngs::StdRng};
/// use twine_dynamics::{
///     models::dynamics::{LinearTransitionModel, Transition, TransitionModel},
///     support::descriptor::{ActionDescriptor, StateDescriptor},
/// };
///
/// let position = StateDescriptor::new("position", 1).unwrap();
/// let velocity = ActionDescriptor::new("velocity", 1).unwrap();
/// let mut model = LinearTransitionModel::with_defaults(position.clone(), velocity);
/// assert_eq!(model.next_states(), &position);
///
/// // x' = x + 0.1 v
/// let transitions: Vec<Transition> = [(0.0, 1.0), (1.0, 0.0), (1.0, 2.0), (-1.0, -1.0)]
///     .into_iter()
///     .map(|(x, v)| Transition {
///         state: DVector::from_vec(vec![x]),
///         action: DVector::from_vec(vec![v]),
///         next_state: DVector::from_vec(vec![x + 0.1 * v]),
///     })
///     .collect();
/// model.fit(&transitions).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let next = model
///     .predict(&DVector::from_vec(vec![2.0]), &DVector::from_vec(vec![5.0]), &mut rng)
///     .unwrap();
/// assert!((next[0] - 2.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct LinearTransitionModel {
    dynamics: DynamicModel<LinearApproximator>,
}

impl LinearTransitionModel {
    /// Builds a linear approximator from `[states, actions]` to the next
    /// states and binds it into a dynamic model.
    ///
    /// The next-state space defaults to `states`. Processors in `config` are
    /// handed to the approximator as-is.
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
            linear,
        } = config;
        let next_states = TransitionConfig::resolve_next_states(next_states, &states);

        let approximator = LinearApproximator::new(
            vec![states.signature(), actions.signature()],
            next_states.signature(),
            preprocessors,
            postprocessors,
            linear,
        );

        debug!(
            states = states.name(),
            actions = actions.name(),
            next_states = next_states.name(),
            input_dim = approximator.input_dim(),
            stochastic = distribution.is_some(),
            "built linear transition model"
        );

        Self {
            dynamics: DynamicModel::new(states, actions, approximator, next_states, distribution),
        }
    }

    /// Shorthand for a deterministic model predicting the next `states`.
    #[must_use]
    pub fn with_defaults(states: StateDescriptor, actions: ActionDescriptor) -> Self {
        Self::new(states, actions, TransitionConfig::default())
    }

    #[must_use]
    pub fn approximator(&self) -> &LinearApproximator {
        self.dynamics.approximator()
    }

    #[must_use]
    pub fn into_inner(self) -> DynamicModel<LinearApproximator> {
        self.dynamics
    }
}

impl TransitionModel for LinearTransitionModel {
    type Approximator = LinearApproximator;

    fn dynamics(&self) -> &DynamicModel<LinearApproximator> {
        &self.dynamics
    }

    fn dynamics_mut(&mut self) -> &mut DynamicModel<LinearApproximator> {
        &mut self.dynamics
    }
}

impl Model for LinearTransitionModel {
    type Input = StateAction;
    type Output = DVector<f64>;
    type Error = DynamicsError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.dynamics.call(input)
    }
}
