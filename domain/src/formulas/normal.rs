//! Standard-normal helpers for Six Sigma conversions.
//!
//! The DPMO <-> sigma mapping needs the inverse standard-normal CDF. There is
//! no erf in std, so this module carries two classic rational approximations:
//! Acklam's inverse-CDF (relative error ~1.15e-9) and the Abramowitz &
//! Stegun erf polynomial for the forward direction.

/// The conventional long-term drift added when reporting sigma levels.
pub const SIGMA_SHIFT: f64 = 1.5;

/// Inverse standard-normal CDF (quantile function), Acklam's approximation.
///
/// Defined for p in (0, 1); returns +/- infinity at the boundaries.
pub fn inverse_norm_cdf(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

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
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

/// Standard-normal CDF via the Abramowitz & Stegun erf polynomial (7.1.26).
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t) * (-x * x).exp();
    sign * y
}

/// Convert DPMO to a sigma level with the 1.5-sigma shift, clamped to [0, 6].
pub fn dpmo_to_sigma(dpmo: f64) -> f64 {
    if dpmo >= 1_000_000.0 {
        return 0.0;
    }
    if dpmo <= 0.0 {
        return 6.0;
    }
    let defect_rate = dpmo / 1_000_000.0;
    let z = inverse_norm_cdf(1.0 - defect_rate);
    (z + SIGMA_SHIFT).clamp(0.0, 6.0)
}

/// Convert a sigma level back to the expected DPMO.
pub fn sigma_to_dpmo(sigma_level: f64) -> f64 {
    let z = sigma_level - SIGMA_SHIFT;
    (1.0 - norm_cdf(z)) * 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_norm_cdf_known_points() {
        assert!((inverse_norm_cdf(0.5)).abs() < 1e-8);
        assert!((inverse_norm_cdf(0.975) - 1.959964).abs() < 1e-4);
        assert!((inverse_norm_cdf(0.025) + 1.959964).abs() < 1e-4);
    }

    #[test]
    fn test_inverse_norm_cdf_boundaries() {
        assert_eq!(inverse_norm_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_norm_cdf(1.0), f64::INFINITY);
    }

    #[test]
    fn test_cdf_inverse_roundtrip() {
        for p in [0.01, 0.1, 0.3, 0.5, 0.7, 0.9, 0.99] {
            let z = inverse_norm_cdf(p);
            assert!((norm_cdf(z) - p).abs() < 1e-6, "p = {}", p);
        }
    }

    #[test]
    fn test_sigma_anchor_points() {
        // Standard Six Sigma table (with 1.5 sigma shift):
        // 3.4 DPMO ~ 6 sigma, 66807 DPMO ~ 3 sigma
        assert!((dpmo_to_sigma(3.4) - 6.0).abs() < 0.01);
        assert!((dpmo_to_sigma(66_807.0) - 3.0).abs() < 0.01);
        assert!((dpmo_to_sigma(308_538.0) - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_sigma_clamping() {
        assert_eq!(dpmo_to_sigma(1_000_000.0), 0.0);
        assert_eq!(dpmo_to_sigma(0.0), 6.0);
    }

    #[test]
    fn test_sigma_to_dpmo_inverts() {
        for sigma in [2.0, 3.0, 4.0, 4.5] {
            let dpmo = sigma_to_dpmo(sigma);
            assert!((dpmo_to_sigma(dpmo) - sigma).abs() < 0.01, "sigma = {}", sigma);
        }
    }
}
