//! Student's t critical values, for confidence intervals on replication
//! means.  One and two degrees of freedom use the closed-form quantiles;
//! larger degrees of freedom use the Cornish-Fisher expansion around the
//! standard normal quantile, which is accurate to about 1e-3 from three
//! degrees of freedom onward.

use std::f64::consts::PI;

use num_traits::Float;

use crate::utils::errors::SimulationError;

// Acklam's rational approximation of the standard normal quantile
const A: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
];
const B: [f64; 5] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
];
const C: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
];
const D: [f64; 4] = [
    7.784695709041462e-03,
    3.224671290700398e-01,
    2.445134137142996e+00,
    3.754408661907416e+00,
];
const P_LOW: f64 = 0.02425;

fn normal_tail(q: f64) -> f64 {
    (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
        / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
}

/// Quantile of the standard normal distribution, for `0 < p < 1`.
pub fn normal_quantile(p: f64) -> f64 {
    if p < P_LOW {
        normal_tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -normal_tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}

/// Quantile of Student's t distribution, for `0 < p < 1`.
pub fn t_quantile(p: f64, degrees_of_freedom: usize) -> f64 {
    match degrees_of_freedom {
        1 => (PI * (p - 0.5)).tan(),
        2 => (2.0 * p - 1.0) / (2.0 * p * (1.0 - p)).sqrt(),
        _ => {
            let z = normal_quantile(p);
            let v = degrees_of_freedom as f64;
            let g1 = (z.powi(3) + z) / 4.0;
            let g2 = (5.0 * z.powi(5) + 16.0 * z.powi(3) + 3.0 * z) / 96.0;
            let g3 = (3.0 * z.powi(7) + 19.0 * z.powi(5) + 17.0 * z.powi(3) - 15.0 * z) / 384.0;
            let g4 = (79.0 * z.powi(9) + 776.0 * z.powi(7) + 1482.0 * z.powi(5)
                - 1920.0 * z.powi(3)
                - 945.0 * z)
                / 92160.0;
            z + g1 / v + g2 / v.powi(2) + g3 / v.powi(3) + g4 / v.powi(4)
        }
    }
}

/// The two-sided critical value `t` with `P(|T| <= t) = 1 - alpha`.
pub fn t_score<T: Float>(alpha: T, degrees_of_freedom: usize) -> Result<T, SimulationError> {
    let alpha = alpha.to_f64().ok_or(SimulationError::FloatConvError)?;
    if degrees_of_freedom == 0 || !(alpha > 0.0 && alpha < 1.0) {
        return Err(SimulationError::PrerequisiteCalcError);
    }
    T::from(t_quantile(1.0 - alpha / 2.0, degrees_of_freedom))
        .ok_or(SimulationError::FloatConvError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_quantiles() {
        assert!((normal_quantile(0.975) - 1.959964).abs() < 1e-6);
        assert!((normal_quantile(0.5)).abs() < 1e-12);
        assert!((normal_quantile(0.01) + 2.326348).abs() < 1e-6);
    }

    #[test]
    fn t_scores_match_tables() {
        assert!((t_score(0.05, 1).unwrap() - 12.706).abs() < 1e-3);
        assert!((t_score(0.05, 2).unwrap() - 4.303).abs() < 1e-3);
        assert!((t_score(0.05, 9).unwrap() - 2.262).abs() < 1e-2);
        assert!((t_score(0.10, 29).unwrap() - 1.699).abs() < 1e-2);
        assert!((t_score(0.01, 60).unwrap() - 2.660).abs() < 1e-2);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(t_score(0.05, 0).is_err());
        assert!(t_score(1.5, 10).is_err());
    }
}
