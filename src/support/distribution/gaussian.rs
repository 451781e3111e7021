use std::f64::consts::{PI, TAU};

use nalgebra::DVector;
use rand::{Rng, RngCore};

use crate::support::{
    constraint::{Constrained, StrictlyPositive},
    descriptor::StateDescriptor,
};

use super::{DistributionError, TransitionDistribution};

const NAME: &str = "diagonal gaussian";

/// Gaussian with a location given by the approximator and a fixed
/// per-dimension standard deviation.
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use rand::{SeedableRng, rngs::StdRng};
/// use twine_dynamics::support::{
///     constraint::StrictlyPositive,
///     descriptor::StateDescriptor,
///     distribution::{DiagonalGaussian, TransitionDistribution},
/// };
///
/// let position = StateDescriptor::new("position", 2).unwrap();
/// let noise = DiagonalGaussian::isotropic(&position, StrictlyPositive::new(0.1).unwrap());
/// let mean = DVector::from_vec(vec![1.0, -1.0]);
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let next = noise.sample(&mean, &mut rng).unwrap();
/// assert_eq!(next.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalGaussian {
    std: DVector<f64>,
}

impl DiagonalGaussian {
    /// Creates a Gaussian over `space` with the same standard deviation in
    /// every dimension.
    #[must_use]
    pub fn isotropic(space: &StateDescriptor, std: Constrained<f64, StrictlyPositive>) -> Self {
        Self {
            std: DVector::from_element(space.dim(), std.into_inner()),
        }
    }

    /// Creates a Gaussian from per-dimension standard deviations.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] if `std` is empty or any entry is not
    /// strictly positive.
    pub fn new(std: DVector<f64>) -> Result<Self, DistributionError> {
        if std.is_empty() {
            return Err(DistributionError::InvalidParameter {
                distribution: NAME,
                context: "no dimensions".into(),
            });
        }
        for (i, s) in std.iter().enumerate() {
            StrictlyPositive::new(*s).map_err(|e| DistributionError::InvalidParameter {
                distribution: NAME,
                context: format!("std[{i}] = {s}: {e}"),
            })?;
        }
        Ok(Self { std })
    }

    #[must_use]
    pub fn std(&self) -> &DVector<f64> {
        &self.std
    }

    fn check_params(&self, params: &DVector<f64>) -> Result<(), DistributionError> {
        if params.len() == self.std.len() {
            Ok(())
        } else {
            Err(DistributionError::ParameterCount {
                distribution: NAME,
                expected: self.std.len(),
                actual: params.len(),
            })
        }
    }
}

/// Draws one standard normal variate using the Box-Muller transform.
fn standard_normal(rng: &mut dyn RngCore) -> f64 {
    // u1 in (0, 1] keeps the log finite.
    let u1: f64 = 1.0 - rng.gen_range(0.0..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

impl TransitionDistribution for DiagonalGaussian {
    fn name(&self) -> &'static str {
        NAME
    }

    fn dim(&self) -> usize {
        self.std.len()
    }

    fn mean(&self, params: &DVector<f64>) -> Result<DVector<f64>, DistributionError> {
        self.check_params(params)?;
        Ok(params.clone())
    }

    fn sample(
        &self,
        params: &DVector<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<DVector<f64>, DistributionError> {
        self.check_params(params)?;
        Ok(params.zip_map(&self.std, |mu, sigma| mu + sigma * standard_normal(&mut *rng)))
    }

    fn log_prob(
        &self,
        params: &DVector<f64>,
        value: &DVector<f64>,
    ) -> Result<f64, DistributionError> {
        self.check_params(params)?;
        if value.len() != self.std.len() {
            return Err(DistributionError::ValueLength {
                distribution: NAME,
                expected: self.std.len(),
                actual: value.len(),
            });
        }

        let log_norm = 0.5 * (2.0 * PI).ln();
        Ok(params
            .iter()
            .zip(value.iter())
            .zip(self.std.iter())
            .map(|((mu, x), sigma)| {
                let z = (x - mu) / sigma;
                -0.5 * z * z - sigma.ln() - log_norm
            })
            .sum())
    }
}
