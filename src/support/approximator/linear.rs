//! Affine function approximator fit by closed-form least squares.

mod config;

pub use config::LinearConfig;

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::support::{descriptor::Signature, processor::Processors};

use super::{Approximator, ApproximatorError, FitReport};

/// Affine map `y = W x + b` over the concatenation of its declared inputs.
///
/// Inputs pass through the pre-processors before the affine map, and
/// outputs pass through the post-processors after it. Fitting regresses
/// pre-processed inputs onto targets given in the raw (pre-post-processing)
/// output space.
///
/// Parameters start at zero, so an unfit approximator predicts the
/// post-processed zero vector.
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use twine_dynamics::support::{
///     approximator::{Approximator, LinearApproximator, LinearConfig},
///     descriptor::{ActionDescriptor, StateDescriptor},
///     processor::Processors,
/// };
///
/// let x = StateDescriptor::new("x", 1).unwrap();
/// let u = ActionDescriptor::new("u", 1).unwrap();
///
/// let mut f = LinearApproximator::new(
///     vec![x.signature(), u.signature()],
///     x.signature(),
///     Processors::new(),
///     Processors::new(),
///     LinearConfig::default(),
/// );
///
/// // x' = x + 0.5 u
/// let inputs: Vec<_> = [(0.0, 1.0), (1.0, 0.0), (2.0, 2.0)]
///     .iter()
///     .map(|&(x, u)| DVector::from_vec(vec![x, u]))
///     .collect();
/// let targets: Vec<_> = inputs
///     .iter()
///     .map(|v| DVector::from_vec(vec![v[0] + 0.5 * v[1]]))
///     .collect();
///
/// f.fit(&inputs, &targets).unwrap();
/// let y = f.predict(&DVector::from_vec(vec![4.0, 2.0])).unwrap();
/// assert!((y[0] - 5.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct LinearApproximator {
    inputs: Vec<Signature>,
    output: Signature,
    preprocessors: Processors,
    postprocessors: Processors,
    config: LinearConfig,
    weights: DMatrix<f64>,
    bias: DVector<f64>,
}

impl LinearApproximator {
    /// Creates a zero-initialized approximator.
    #[must_use]
    pub fn new(
        inputs: Vec<Signature>,
        output: Signature,
        preprocessors: Processors,
        postprocessors: Processors,
        config: LinearConfig,
    ) -> Self {
        let input_dim = Signature::total_dim(&inputs).unwrap_or(0);
        let output_dim = output.dim();
        Self {
            inputs,
            output,
            preprocessors,
            postprocessors,
            config,
            weights: DMatrix::zeros(output_dim, input_dim),
            bias: DVector::zeros(output_dim),
        }
    }

    /// Replaces the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApproximatorError::ParameterShape`] if `weights` is not
    /// `output_dim x input_dim` or `bias` is not `output_dim` long.
    pub fn with_parameters(
        mut self,
        weights: DMatrix<f64>,
        bias: DVector<f64>,
    ) -> Result<Self, ApproximatorError> {
        let expected = self.weights.shape();
        if weights.shape() != expected {
            return Err(ApproximatorError::ParameterShape {
                context: format!("weights are {:?}, expected {expected:?}", weights.shape()),
            });
        }
        if bias.len() != self.bias.len() {
            return Err(ApproximatorError::ParameterShape {
                context: format!("bias has length {}, expected {}", bias.len(), self.bias.len()),
            });
        }
        self.weights = weights;
        self.bias = bias;
        Ok(self)
    }

    #[must_use]
    pub fn inputs(&self) -> &[Signature] {
        &self.inputs
    }

    #[must_use]
    pub fn output(&self) -> &Signature {
        &self.output
    }

    #[must_use]
    pub fn preprocessors(&self) -> &Processors {
        &self.preprocessors
    }

    #[must_use]
    pub fn postprocessors(&self) -> &Processors {
        &self.postprocessors
    }

    #[must_use]
    pub fn config(&self) -> &LinearConfig {
        &self.config
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.weights.ncols()
    }

    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight matrix, `output_dim x input_dim`.
    #[must_use]
    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    #[must_use]
    pub fn bias(&self) -> &DVector<f64> {
        &self.bias
    }

    fn preprocess(&self, input: &DVector<f64>) -> Result<DVector<f64>, ApproximatorError> {
        if input.len() != self.input_dim() {
            return Err(ApproximatorError::InputLength {
                expected: self.input_dim(),
                actual: input.len(),
            });
        }
        Ok(self.preprocessors.apply(input.clone())?)
    }

    /// Builds the `n x p` design matrix and `n x m` target matrix.
    fn design(
        &self,
        inputs: &[DVector<f64>],
        targets: &[DVector<f64>],
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), ApproximatorError> {
        if inputs.len() != targets.len() {
            return Err(ApproximatorError::SampleCount {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }
        if inputs.is_empty() {
            return Err(ApproximatorError::EmptyData);
        }

        let n = inputs.len();
        let d = self.input_dim();
        let m = self.output_dim();
        let p = d + usize::from(self.config.fit_bias);

        let mut x = DMatrix::<f64>::zeros(n, p);
        let mut y = DMatrix::<f64>::zeros(n, m);
        for (i, (input, target)) in inputs.iter().zip(targets).enumerate() {
            if target.len() != m {
                return Err(ApproximatorError::TargetLength {
                    expected: m,
                    actual: target.len(),
                });
            }
            let input = self.preprocess(input)?;
            check_finite(i, "input", &input)?;
            check_finite(i, "target", target)?;
            for (j, v) in input.iter().enumerate() {
                x[(i, j)] = *v;
            }
            if self.config.fit_bias {
                x[(i, d)] = 1.0;
            }
            for (j, v) in target.iter().enumerate() {
                y[(i, j)] = *v;
            }
        }
        Ok((x, y))
    }

    /// Solves `min |X θ - Y|² + λ |θ_w|²` for `θ` (`p x m`).
    ///
    /// The ridge term is folded in by stacking `sqrt(λ) I` under the weight
    /// columns of `X` and zeros under `Y`, so both cases share one SVD solve.
    fn solve(
        &self,
        x: &DMatrix<f64>,
        y: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, ApproximatorError> {
        let (n, p) = x.shape();
        let d = self.input_dim();
        let ridge = self.config.ridge.get();
        let extra = if ridge > 0.0 { d } else { 0 };
        let root = ridge.sqrt();

        let x_aug = DMatrix::from_fn(n + extra, p, |i, j| {
            if i < n {
                x[(i, j)]
            } else if j == i - n {
                root
            } else {
                0.0
            }
        });
        let y_aug = DMatrix::from_fn(
            n + extra,
            y.ncols(),
            |i, j| if i < n { y[(i, j)] } else { 0.0 },
        );

        let svd = x_aug.svd(true, true);
        let tol = svd.singular_values.max() * self.config.rcond.get();
        let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
        if rank < p {
            warn!(rank, params = p, "rank-deficient design, using minimum-norm solution");
        }

        svd.solve(&y_aug, tol)
            .map_err(|context| ApproximatorError::Solve { context })
    }
}

/// Rejects NaN and infinite values before they reach the SVD.
fn check_finite(
    sample: usize,
    context: &'static str,
    values: &DVector<f64>,
) -> Result<(), ApproximatorError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ApproximatorError::NonFinite { sample, context })
    }
}

impl Approximator for LinearApproximator {
    fn predict(&self, input: &DVector<f64>) -> Result<DVector<f64>, ApproximatorError> {
        let x = self.preprocess(input)?;
        let y = &self.weights * x + &self.bias;
        Ok(self.postprocessors.apply(y)?)
    }

    fn fit(
        &mut self,
        inputs: &[DVector<f64>],
        targets: &[DVector<f64>],
    ) -> Result<FitReport, ApproximatorError> {
        let (x, y) = self.design(inputs, targets)?;
        let theta = self.solve(&x, &y)?;

        let d = self.input_dim();
        self.weights = theta.rows(0, d).transpose();
        self.bias = if self.config.fit_bias {
            theta.row(d).transpose()
        } else {
            DVector::zeros(self.output_dim())
        };

        #[allow(clippy::cast_precision_loss)]
        let rmse = ((&x * &theta - &y).norm_squared() / (y.len() as f64)).sqrt();
        let report = FitReport {
            samples: inputs.len(),
            rmse,
        };

        debug!(
            samples = report.samples,
            input_dim = d,
            output_dim = self.output_dim(),
            rmse = report.rmse,
            "fit linear approximator"
        );
        Ok(report)
    }
}
