//! Special functions needed by the Beckmann microfacet model.
//!
//! `std` has no error function for `f32`, so both directions are
//! approximated here: `erf` with Abramowitz & Stegun 7.1.26 (absolute error
//! below 1.5e-7) and `erf_inv` with the single precision polynomial of
//! Giles, "Approximating the erfinv function" (2010).

/// The error function.
pub fn erf(x: f32) -> f32 {
    const A1: f32 = 0.254_829_6;
    const A2: f32 = -0.284_496_74;
    const A3: f32 = 1.421_413_8;
    const A4: f32 = -1.453_152_1;
    const A5: f32 = 1.061_405_4;
    const P: f32 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

/// Inverse of [`erf`] on (-1, 1). Inputs are clamped just inside the open
/// interval so the result stays finite.
pub fn erf_inv(x: f32) -> f32 {
    let x = x.clamp(-0.99999, 0.99999);
    let mut w = -((1.0 - x) * (1.0 + x)).ln();

    let p = if w < 5.0 {
        w -= 2.5;
        let mut p = 2.810_226_4e-08;
        p = 3.432_739_4e-07 + p * w;
        p = -3.523_387_7e-06 + p * w;
        p = -4.391_506_5e-06 + p * w;
        p = 0.000_218_580_87 + p * w;
        p = -0.001_253_725 + p * w;
        p = -0.004_177_681_6 + p * w;
        p = 0.246_640_73 + p * w;
        1.501_409_4 + p * w
    } else {
        w = w.sqrt() - 3.0;
        let mut p = -0.000_200_214_26;
        p = 0.000_100_950_56 + p * w;
        p = 0.001_349_343_2 + p * w;
        p = -0.003_673_428_4 + p * w;
        p = 0.005_739_507_7 + p * w;
        p = -0.007_622_461_3 + p * w;
        p = 0.009_438_870_5 + p * w;
        p = 1.001_674_1 + p * w;
        2.832_976_8 + p * w
    };

    p * x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erf_known_values() {
        assert!(erf(0.0).abs() < 1e-6);
        assert!((erf(0.5) - 0.520_499_9).abs() < 1e-5);
        assert!((erf(1.0) - 0.842_700_8).abs() < 1e-5);
        assert!((erf(2.0) - 0.995_322_3).abs() < 1e-5);
        assert!((erf(10.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_erf_is_odd() {
        for x in [0.1, 0.7, 1.3, 2.9] {
            assert!((erf(-x) + erf(x)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_erf_inv_inverts_erf() {
        for x in [-2.0f32, -1.0, -0.3, 0.0, 0.25, 0.9, 1.7] {
            let y = erf(x);
            assert!(
                (erf_inv(y) - x).abs() < 1e-3,
                "erf_inv(erf({})) = {}",
                x,
                erf_inv(y)
            );
        }
    }

    #[test]
    fn test_erf_inv_saturates() {
        assert!(erf_inv(1.0).is_finite());
        assert!(erf_inv(-1.0).is_finite());
        assert!(erf_inv(1.0) > 3.0);
    }
}
