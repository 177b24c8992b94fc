//! This is the vector math module
//! Provide L2 norm, dot product and cosine similarity

use crate::error::{Result, StoreError};

/// L2 norm (magnitude)
/// ||vec|| = sqrt(sum(vec[i]^2))
///
/// Components are divided by the largest absolute component before squaring,
/// so finite inputs such as `[1e200, 0.0]` or `[1e-200, 0.0]` keep their norm.
pub fn l2_norm(vector: &[f64]) -> f64 {
    Magnitude::of(vector).norm()
}

/// A vector's norm split into its largest absolute component (`scale`) and
/// the norm of the vector divided by that component (`scaled_norm`, in
/// `[1, sqrt(len)]` for finite non-zero input).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Magnitude {
    pub(crate) scale: f64,
    pub(crate) scaled_norm: f64,
}

impl Magnitude {
    pub(crate) fn of(vector: &[f64]) -> Self {
        let scale = vector.iter().fold(0.0_f64, |max, x| max.max(x.abs()));
        if scale == 0.0 {
            return Magnitude { scale, scaled_norm: 0.0 };
        }

        let scaled_norm = vector.iter()
            .map(|x| {
                let scaled = x / scale;
                scaled * scaled
            })
            .sum::<f64>()
            .sqrt();

        Magnitude { scale, scaled_norm }
    }

    pub(crate) fn norm(&self) -> f64 {
        self.scale * self.scaled_norm
    }
}

/// L2 Normalization
/// norm_vec = vec / ||vec||
/// Empty and zero vectors cannot be normalized and yield `None`
pub fn l2_normalize(vector: &[f64]) -> Option<Vec<f64>> {
    let norm = l2_norm(vector);
    if vector.is_empty() || norm == 0.0 || !norm.is_finite() {
        return None;
    }

    Some(vector.iter().map(|x| x / norm).collect())
}

/// Dot Product
/// dot_prod = sum(a[i] * b[i]) for i = 0..a.len()
/// Can only process vectors with same dimensions
pub fn dot_product(left: &[f64], right: &[f64]) -> Result<f64> {
    if left.len() != right.len() {
        return Err(StoreError::DimensionMismatch {
            expected: left.len(),
            actual: right.len(),
        });
    }

    Ok(left.iter()
        .zip(right.iter())
        .map(|(x, y)| x * y)
        .sum())
}

/// Cosine similarity
/// cos = dot(a, b) / (||a|| * ||b||)
///
/// A zero-norm operand gives 0 instead of dividing by zero, and any
/// non-finite result (NaN or infinite inputs) is reported as 0 as well.
pub fn cosine_similarity(left: &[f64], right: &[f64]) -> Result<f64> {
    if left.len() != right.len() {
        return Err(StoreError::DimensionMismatch {
            expected: left.len(),
            actual: right.len(),
        });
    }

    Ok(cosine_with_magnitudes(left, &Magnitude::of(left), right, &Magnitude::of(right)))
}

/// Cosine of two equal-length slices whose magnitudes are already known.
///
/// Both operands are divided by their scale before multiplying, so the dot
/// product stays in range for any finite input. Applies the same zero-norm
/// and non-finite policy as [`cosine_similarity`].
pub(crate) fn cosine_with_magnitudes(
    left: &[f64],
    left_magnitude: &Magnitude,
    right: &[f64],
    right_magnitude: &Magnitude,
) -> f64 {
    if left_magnitude.scale == 0.0 || right_magnitude.scale == 0.0 {
        return 0.0;
    }

    let dot: f64 = left.iter()
        .zip(right.iter())
        .map(|(x, y)| (x / left_magnitude.scale) * (y / right_magnitude.scale))
        .sum();

    let score = dot / (left_magnitude.scaled_norm * right_magnitude.scaled_norm);
    // + 0.0 folds -0.0 into 0.0 so equal scores tie under total_cmp
    if score.is_finite() { score + 0.0 } else { 0.0 }
}
