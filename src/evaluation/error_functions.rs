use std::f64::consts::PI;

use ndarray::{Array, ArrayBase, Axis, Data, Dimension, RemoveAxis, Zip};

use crate::error::EvalError;

fn check_shapes(left: &[usize], right: &[usize]) -> Result<(), EvalError> {
    if left != right {
        return Err(EvalError::ShapeMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        });
    }
    Ok(())
}

/// L2 distance between `pred` and `gt` along the last axis.
///
/// For `[batch, dims]` inputs the result has shape `[batch]`.
pub fn l2_error<S1, S2, D>(
    pred: &ArrayBase<S1, D>,
    gt: &ArrayBase<S2, D>,
) -> Result<Array<f64, D::Smaller>, EvalError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    check_shapes(pred.shape(), gt.shape())?;
    if pred.ndim() == 0 {
        return Err(EvalError::EmptyInput);
    }
    let last = Axis(pred.ndim() - 1);
    let squared = Zip::from(pred)
        .and(gt)
        .map_collect(|&p, &g| (p - g) * (p - g));
    Ok(squared.sum_axis(last).mapv(f64::sqrt))
}

/// Signed difference `angle_b - angle_a` in radians, wrapped into [-pi, pi].
///
/// Wraps twice with `%` and subtracts instead of branching on the sign. An
/// exact difference of `pi` maps to `-pi` and one of `-pi` maps to `pi`.
pub fn closest_angle<S1, S2, D>(
    angle_a: &ArrayBase<S1, D>,
    angle_b: &ArrayBase<S2, D>,
) -> Result<Array<f64, D>, EvalError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    check_shapes(angle_a.shape(), angle_b.shape())?;
    Ok(Zip::from(angle_a)
        .and(angle_b)
        .map_collect(|&a, &b| wrap_angle_difference(a, b)))
}

pub(crate) fn wrap_angle_difference(a: f64, b: f64) -> f64 {
    let two_pi = 2.0 * PI;
    let wrapped = (b - a) % two_pi;
    (2.0 * wrapped) % two_pi - wrapped
}

/// Mean of the elementwise squared differences.
pub fn mean_squared_error<S1, S2, D>(
    pred: &ArrayBase<S1, D>,
    gt: &ArrayBase<S2, D>,
) -> Result<f64, EvalError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    check_shapes(pred.shape(), gt.shape())?;
    if pred.is_empty() {
        return Err(EvalError::EmptyInput);
    }
    let total = Zip::from(pred)
        .and(gt)
        .fold(0.0, |acc, &p, &g| acc + (p - g) * (p - g));
    Ok(total / pred.len() as f64)
}
