use nalgebra::{DMatrix, DVector};

use crate::support::descriptor::{ActionDescriptor, StateDescriptor};

use super::Transition;

pub(super) fn state_space(dim: usize) -> StateDescriptor {
    StateDescriptor::new("state", dim).unwrap()
}

pub(super) fn action_space(dim: usize) -> ActionDescriptor {
    ActionDescriptor::new("action", dim).unwrap()
}

pub(super) fn vector(values: &[f64]) -> DVector<f64> {
    DVector::from_column_slice(values)
}

/// Noise-free samples of `s' = A s + B a + c` on a 3-point grid per component.
pub(super) fn affine_transitions(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    c: &DVector<f64>,
) -> Vec<Transition> {
    let state_dim = a.ncols();
    let action_dim = b.ncols();
    let dim = state_dim + action_dim;
    let grid = [-1.0, 0.5, 2.0];

    let count = grid.len().pow(u32::try_from(dim).unwrap());
    (0..count)
        .map(|mut index| {
            let point: Vec<f64> = (0..dim)
                .map(|_| {
                    let v = grid[index % grid.len()];
                    index /= grid.len();
                    v
                })
                .collect();
            let state = vector(&point[..state_dim]);
            let action = vector(&point[state_dim..]);
            let next_state = a * &state + b * &action + c;
            Transition {
                state,
                action,
                next_state,
            }
        })
        .collect()
}
