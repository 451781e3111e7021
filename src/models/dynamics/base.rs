//! Parametrized dynamic model shared by all transition models.

mod config;
mod error;

pub use config::TransitionConfig;
pub use error::DynamicsError;

use std::sync::Arc;

use nalgebra::DVector;
use rand::RngCore;
use twine_core::Model;

use crate::support::{
    approximator::{Approximator, FitReport},
    descriptor::{ActionDescriptor, StateDescriptor},
    distribution::TransitionDistribution,
};

/// Input of one model call.
#[derive(Debug, Clone, PartialEq)]
pub struct StateAction {
    pub state: DVector<f64>,
    pub action: DVector<f64>,
}

impl StateAction {
    #[must_use]
    pub fn new(state: DVector<f64>, action: DVector<f64>) -> Self {
        Self { state, action }
    }
}

/// One observed `(s, a, s')` sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: DVector<f64>,
    pub action: DVector<f64>,
    pub next_state: DVector<f64>,
}

/// A transition model `p(s' | s, a)` backed by a learnable approximator.
///
/// The approximator maps the concatenated `[state; action]` vector to either
/// the next state (deterministic) or the parameters of `distribution`
/// (stochastic).
#[derive(Debug, Clone)]
pub struct DynamicModel<A> {
    states: StateDescriptor,
    actions: ActionDescriptor,
    next_states: StateDescriptor,
    approximator: A,
    distribution: Option<Arc<dyn TransitionDistribution>>,
}

impl<A> DynamicModel<A> {
    /// Binds an approximator to its state, action, and next-state spaces.
    ///
    /// A distribution over a different dimension than `next_states` is kept
    /// but logged, since every stochastic call will then fail.
    #[must_use]
    pub fn new(
        states: StateDescriptor,
        actions: ActionDescriptor,
        approximator: A,
        next_states: StateDescriptor,
        distribution: Option<Arc<dyn TransitionDistribution>>,
    ) -> Self {
        if let Some(distribution) = &distribution {
            if distribution.dim() != next_states.dim() {
                tracing::warn!(
                    distribution = distribution.name(),
                    distribution_dim = distribution.dim(),
                    next_states = next_states.name(),
                    next_states_dim = next_states.dim(),
                    "distribution dimension differs from next states, predictions will fail"
                );
            }
        }
        Self {
            states,
            actions,
            next_states,
            approximator,
            distribution,
        }
    }

    #[must_use]
    pub fn states(&self) -> &StateDescriptor {
        &self.states
    }

    #[must_use]
    pub fn actions(&self) -> &ActionDescriptor {
        &self.actions
    }

    #[must_use]
    pub fn next_states(&self) -> &StateDescriptor {
        &self.next_states
    }

    #[must_use]
    pub fn approximator(&self) -> &A {
        &self.approximator
    }

    pub fn approximator_mut(&mut self) -> &mut A {
        &mut self.approximator
    }

    #[must_use]
    pub fn distribution(&self) -> Option<&Arc<dyn TransitionDistribution>> {
        self.distribution.as_ref()
    }

    /// True when predictions are point estimates rather than samples.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.distribution.is_none()
    }
}

impl<A: Approximator> DynamicModel<A> {
    /// Validates `(state, action)` and concatenates them into one input vector.
    fn input(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
    ) -> Result<DVector<f64>, DynamicsError> {
        self.approximator.ensure_configured()?;

        if state.len() != self.states.dim() {
            return Err(DynamicsError::StateLength {
                expected: self.states.dim(),
                actual: state.len(),
            });
        }
        if action.len() != self.actions.dim() {
            return Err(DynamicsError::ActionLength {
                expected: self.actions.dim(),
                actual: action.len(),
            });
        }

        Ok(DVector::from_iterator(
            state.len() + action.len(),
            state.iter().chain(action.iter()).copied(),
        ))
    }

    /// Raw approximator output: the next state, or distribution parameters.
    fn params(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
    ) -> Result<DVector<f64>, DynamicsError> {
        let input = self.input(state, action)?;
        Ok(self.approximator.predict(&input)?)
    }

    /// Expected next state.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError`] on malformed inputs or collaborator failure.
    pub fn mean(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
    ) -> Result<DVector<f64>, DynamicsError> {
        let params = self.params(state, action)?;
        match &self.distribution {
            Some(distribution) => Ok(distribution.mean(&params)?),
            None => Ok(params),
        }
    }

    /// Predicted next state: the mean when deterministic, otherwise a sample.
    ///
    /// `rng` is only drawn from when the model has a distribution.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError`] on malformed inputs or collaborator failure.
    pub fn predict(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<DVector<f64>, DynamicsError> {
        let params = self.params(state, action)?;
        match &self.distribution {
            Some(distribution) => Ok(distribution.sample(&params, rng)?),
            None => Ok(params),
        }
    }

    /// Log-density of `next_state` under `p(s' | state, action)`.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError::Deterministic`] if the model has no
    /// distribution, or another [`DynamicsError`] on malformed inputs.
    pub fn log_prob(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
        next_state: &DVector<f64>,
    ) -> Result<f64, DynamicsError> {
        self.approximator.ensure_configured()?;
        let distribution = self.distribution.as_ref().ok_or(DynamicsError::Deterministic)?;
        self.check_next_state(next_state)?;

        let params = self.params(state, action)?;
        Ok(distribution.log_prob(&params, next_state)?)
    }

    /// Fits the approximator to observed transitions.
    ///
    /// Targets are the observed next states, so with a distribution this fits
    /// its location parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError`] on malformed transitions or a failed fit.
    pub fn fit(&mut self, transitions: &[Transition]) -> Result<FitReport, DynamicsError> {
        self.approximator.ensure_configured()?;

        let mut inputs = Vec::with_capacity(transitions.len());
        let mut targets = Vec::with_capacity(transitions.len());
        for t in transitions {
            inputs.push(self.input(&t.state, &t.action)?);
            self.check_next_state(&t.next_state)?;
            targets.push(t.next_state.clone());
        }

        let report = self.approximator.fit(&inputs, &targets)?;
        tracing::debug!(
            states = self.states.name(),
            actions = self.actions.name(),
            samples = report.samples,
            rmse = report.rmse,
            "fit dynamic model"
        );
        Ok(report)
    }

    /// Simulates a trajectory by chaining predictions over `actions`.
    ///
    /// Returns the visited next states, one per action (the initial state is
    /// not included).
    ///
    /// # Errors
    ///
    /// Returns [`DynamicsError::RolloutSpace`] if next states can't be fed
    /// back as states, or any error raised by [`DynamicModel::predict`].
    pub fn rollout(
        &self,
        initial_state: &DVector<f64>,
        actions: &[DVector<f64>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<DVector<f64>>, DynamicsError> {
        self.approximator.ensure_configured()?;
        if self.next_states.dim() != self.states.dim() {
            return Err(DynamicsError::RolloutSpace {
                states: self.states.dim(),
                next_states: self.next_states.dim(),
            });
        }

        let mut trajectory = Vec::with_capacity(actions.len());
        let mut state = initial_state.clone();
        for action in actions {
            state = self.predict(&state, action, rng)?;
            trajectory.push(state.clone());
        }
        Ok(trajectory)
    }

    fn check_next_state(&self, next_state: &DVector<f64>) -> Result<(), DynamicsError> {
        if next_state.len() == self.next_states.dim() {
            Ok(())
        } else {
            Err(DynamicsError::NextStateLength {
                expected: self.next_states.dim(),
                actual: next_state.len(),
            })
        }
    }
}

/// Evaluates the expected next state.
impl<A: Approximator> Model for DynamicModel<A> {
    type Input = StateAction;
    type Output = DVector<f64>;
    type Error = DynamicsError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.mean(&input.state, &input.action)
    }
}

/// Uniform access to a [`DynamicModel`] through a configured wrapper.
///
/// Wrappers only need to expose their base model; every operation is
/// provided.
pub trait TransitionModel {
    type Approximator: Approximator;

    fn dynamics(&self) -> &DynamicModel<Self::Approximator>;

    fn dynamics_mut(&mut self) -> &mut DynamicModel<Self::Approximator>;

    fn states(&self) -> &StateDescriptor {
        self.dynamics().states()
    }

    fn actions(&self) -> &ActionDescriptor {
        self.dynamics().actions()
    }

    fn next_states(&self) -> &StateDescriptor {
        self.dynamics().next_states()
    }

    fn is_deterministic(&self) -> bool {
        self.dynamics().is_deterministic()
    }

    /// See [`DynamicModel::mean`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`DynamicModel::mean`].
    fn mean(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
    ) -> Result<DVector<f64>, DynamicsError> {
        self.dynamics().mean(state, action)
    }

    /// See [`DynamicModel::predict`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`DynamicModel::predict`].
    fn predict(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<DVector<f64>, DynamicsError> {
        self.dynamics().predict(state, action, rng)
    }

    /// See [`DynamicModel::log_prob`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`DynamicModel::log_prob`].
    fn log_prob(
        &self,
        state: &DVector<f64>,
        action: &DVector<f64>,
        next_state: &DVector<f64>,
    ) -> Result<f64, DynamicsError> {
        self.dynamics().log_prob(state, action, next_state)
    }

    /// See [`DynamicModel::fit`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`DynamicModel::fit`].
    fn fit(&mut self, transitions: &[Transition]) -> Result<FitReport, DynamicsError> {
        self.dynamics_mut().fit(transitions)
    }

    /// See [`DynamicModel::rollout`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`DynamicModel::rollout`].
    fn rollout(
        &self,
        initial_state: &DVector<f64>,
        actions: &[DVector<f64>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<DVector<f64>>, DynamicsError> {
        self.dynamics().rollout(initial_state, actions, rng)
    }
}

impl<A: Approximator> TransitionModel for DynamicModel<A> {
    type Approximator = A;

    fn dynamics(&self) -> &DynamicModel<A> {
        self
    }

    fn dynamics_mut(&mut self) -> &mut DynamicModel<A> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        models::dynamics::test_support::{action_space, affine_transitions, state_space, vector},
        support::{
            approximator::{LinearApproximator, LinearConfig},
            constraint::StrictlyPositive,
            distribution::{DiagonalGaussian, DistributionError},
            processor::Processors,
        },
    };

    /// `s' = s + 0.1 a` over a 2-d state and 1-d action.
    fn model(
        distribution: Option<Arc<dyn TransitionDistribution>>,
    ) -> DynamicModel<LinearApproximator> {
        let s = state_space(2);
        let a = action_space(1);
        let approximator = LinearApproximator::new(
            vec![s.signature(), a.signature()],
            s.signature(),
            Processors::new(),
            Processors::new(),
            LinearConfig::default(),
        )
        .with_parameters(
            DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.1, 0.0, 1.0, 0.1]),
            DVector::zeros(2),
        )
        .unwrap();
        DynamicModel::new(s.clone(), a, approximator, s, distribution)
    }

    fn noisy() -> Option<Arc<dyn TransitionDistribution>> {
        Some(Arc::new(DiagonalGaussian::isotropic(
            &state_space(2),
            StrictlyPositive::new(0.5).unwrap(),
        )))
    }

    #[test]
    fn deterministic_predict_is_the_mean() {
        let m = model(None);
        assert!(m.is_deterministic());

        let s = vector(&[1.0, 2.0]);
        let a = vector(&[10.0]);
        let mean = m.mean(&s, &a).unwrap();
        assert_relative_eq!(mean, vector(&[2.0, 3.0]), epsilon = 1e-12);

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(m.predict(&s, &a, &mut rng).unwrap(), mean);
        assert_eq!(m.predict(&s, &a, &mut rng).unwrap(), mean);
    }

    #[test]
    fn stochastic_predict_samples_around_the_mean() {
        let m = model(noisy());
        assert!(!m.is_deterministic());

        let s = vector(&[1.0, 2.0]);
        let a = vector(&[10.0]);
        let mean = m.mean(&s, &a).unwrap();
        assert_relative_eq!(mean, vector(&[2.0, 3.0]), epsilon = 1e-12);

        let mut rng = StdRng::seed_from_u64(3);
        let first = m.predict(&s, &a, &mut rng).unwrap();
        let second = m.predict(&s, &a, &mut rng).unwrap();
        assert_ne!(first, second);
        assert_ne!(first, mean);

        let n = 5_000;
        let avg = (0..n)
            .map(|_| m.predict(&s, &a, &mut rng).unwrap())
            .fold(DVector::<f64>::zeros(2), |acc, x| acc + x)
            / f64::from(n);
        assert_relative_eq!(avg, mean, epsilon = 0.05);
    }

    #[test]
    fn log_prob_needs_a_distribution() {
        let s = vector(&[0.0, 0.0]);
        let a = vector(&[0.0]);

        assert_eq!(
            model(None).log_prob(&s, &a, &s),
            Err(DynamicsError::Deterministic)
        );

        let lp = model(noisy()).log_prob(&s, &a, &s).unwrap();
        let expected = 2.0 * (-(0.5_f64.ln()) - 0.5 * (2.0 * std::f64::consts::PI).ln());
        assert_relative_eq!(lp, expected, epsilon = 1e-12);
    }

    #[test]
    fn rejects_wrong_lengths() {
        let m = model(None);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            m.mean(&vector(&[1.0]), &vector(&[0.0])),
            Err(DynamicsError::StateLength {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            m.predict(&vector(&[1.0, 1.0]), &vector(&[0.0, 0.0]), &mut rng),
            Err(DynamicsError::ActionLength {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            model(noisy()).log_prob(&vector(&[1.0, 1.0]), &vector(&[0.0]), &vector(&[1.0])),
            Err(DynamicsError::NextStateLength {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn fit_recovers_dynamics() {
        let s = state_space(2);
        let a = action_space(1);
        let approximator = LinearApproximator::new(
            vec![s.signature(), a.signature()],
            s.signature(),
            Processors::new(),
            Processors::new(),
            LinearConfig::default(),
        );
        let mut m = DynamicModel::new(s.clone(), a, approximator, s, None);

        let a_mat = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, -0.1, 0.9]);
        let b_mat = DMatrix::from_row_slice(2, 1, &[0.0, 0.5]);
        let c = vector(&[0.01, -0.02]);
        let transitions = affine_transitions(&a_mat, &b_mat, &c);

        let report = m.fit(&transitions).unwrap();
        assert_eq!(report.samples, transitions.len());
        assert_relative_eq!(report.rmse, 0.0, epsilon = 1e-10);

        let s0 = vector(&[0.3, -0.4]);
        let u0 = vector(&[2.0]);
        let expected = &a_mat * &s0 + &b_mat * &u0 + &c;
        assert_relative_eq!(m.mean(&s0, &u0).unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn fit_rejects_bad_next_state() {
        let mut m = model(None);
        let bad = Transition {
            state: vector(&[0.0, 0.0]),
            action: vector(&[0.0]),
            next_state: vector(&[0.0, 0.0, 0.0]),
        };
        assert_eq!(
            m.fit(&[bad]),
            Err(DynamicsError::NextStateLength {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn rollout_chains_predictions() {
        let m = model(None);
        let mut rng = StdRng::seed_from_u64(0);

        let actions = vec![vector(&[10.0]), vector(&[10.0]), vector(&[-10.0])];
        let trajectory = m.rollout(&vector(&[0.0, 0.0]), &actions, &mut rng).unwrap();

        assert_eq!(trajectory.len(), 3);
        assert_relative_eq!(trajectory[0], vector(&[1.0, 1.0]), epsilon = 1e-12);
        assert_relative_eq!(trajectory[1], vector(&[2.0, 2.0]), epsilon = 1e-12);
        assert_relative_eq!(trajectory[2], vector(&[1.0, 1.0]), epsilon = 1e-12);

        assert!(m.rollout(&vector(&[0.0, 0.0]), &[], &mut rng).unwrap().is_empty());
    }

    #[test]
    fn rollout_needs_matching_spaces() {
        let s = state_space(2);
        let a = action_space(1);
        let velocity = StateDescriptor::new("velocity", 1).unwrap();
        let approximator = LinearApproximator::new(
            vec![s.signature(), a.signature()],
            velocity.signature(),
            Processors::new(),
            Processors::new(),
            LinearConfig::default(),
        );
        let m = DynamicModel::new(s, a, approximator, velocity, None);

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            m.rollout(&vector(&[0.0, 0.0]), &[vector(&[1.0])], &mut rng),
            Err(DynamicsError::RolloutSpace {
                states: 2,
                next_states: 1
            })
        );
    }

    #[test]
    fn twine_model_returns_the_mean() {
        let m = model(noisy());
        let input = StateAction::new(vector(&[1.0, 2.0]), vector(&[10.0]));
        let output = m.call(&input).unwrap();
        assert_relative_eq!(output, vector(&[2.0, 3.0]), epsilon = 1e-12);
    }

    #[test]
    fn mismatched_distribution_fails_on_use() {
        let wide: Arc<dyn TransitionDistribution> = Arc::new(DiagonalGaussian::isotropic(
            &state_space(3),
            StrictlyPositive::new(1.0).unwrap(),
        ));
        assert_eq!(wide.dim(), 3);

        let m = model(Some(wide));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            m.predict(&vector(&[0.0, 0.0]), &vector(&[0.0]), &mut rng),
            Err(DynamicsError::Distribution(DistributionError::ParameterCount {
                distribution: "diagonal gaussian",
                expected: 3,
                actual: 2
            }))
        );
    }
}
