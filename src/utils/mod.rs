//! The utilies module provides general capabilities, that may span the
//! input modeling, models, output analysis, and simulator modules.  The
//! utilities are centered around error reporting and common arithmetic.

pub mod errors;

/// Tolerance used when checking that a probability vector sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1.0e-6;

/// Division used by the statistics finalizer.  A zero (or non-finite)
/// denominator means nothing was observed - no simulated time elapsed, or no
/// entity was served - and the ratio is reported as zero instead of NaN or
/// infinity.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// Checks that a set of weights is a probability vector: every weight is
/// finite and non-negative, and the weights sum to one.
pub fn is_probability_vector(weights: &[f64]) -> bool {
    !weights.is_empty()
        && weights
            .iter()
            .all(|weight| weight.is_finite() && *weight >= 0.0)
        && (weights.iter().sum::<f64>() - 1.0).abs() < PROBABILITY_TOLERANCE
}
