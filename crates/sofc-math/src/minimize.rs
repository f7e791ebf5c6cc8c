// ─────────────────────────────────────────────────────────────────────
// SOFC Stack Core — Bounded Scalar Minimization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Derivative-free bounded 1-D minimization.
//!
//! Brent's method: parabolic interpolation through the three best points,
//! falling back to a golden-section step whenever the parabola is
//! unacceptable (Brent, Algorithms for Minimization without Derivatives, 1973).
//! The function is only ever evaluated strictly inside `(lower, upper)`.
//!
//! Stopping rule: `|x - xm| <= 2·tol - (b - a)/2` with
//! `tol = sqrt(eps)·|x| + x_tol/3`.

/// (3 - sqrt(5)) / 2
const GOLDEN_MEAN: f64 = 0.381_966_011_250_105_1;

/// sqrt(f64::EPSILON)
const SQRT_EPS: f64 = 1.490_116_119_384_765_6e-8;

/// Tolerances for [`minimize_bounded`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeConfig {
    /// Absolute tolerance on the abscissa.
    pub x_tol: f64,
    /// Function evaluation budget.
    pub max_iterations: usize,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        MinimizeConfig {
            x_tol: 1e-9,
            max_iterations: 500,
        }
    }
}

impl MinimizeConfig {
    pub fn new(x_tol: f64, max_iterations: usize) -> Self {
        MinimizeConfig {
            x_tol,
            max_iterations,
        }
    }
}

/// Result of a bounded minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    /// Best abscissa found.
    pub x: f64,
    /// Objective at `x`.
    pub fx: f64,
    /// Number of objective evaluations.
    pub iterations: usize,
    /// False when the evaluation budget ran out before the tolerance was met;
    /// `x` is then the best interior point seen.
    pub converged: bool,
}

/// Minimize `f` over `[lower, upper]`.
///
/// NaN objective values are treated as `+inf`, so a region where the model
/// breaks down is simply never preferred. Bounds given in reverse order are
/// swapped; a zero-width interval returns its single point.
pub fn minimize_bounded<F>(mut f: F, lower: f64, upper: f64, config: &MinimizeConfig) -> Minimum
where
    F: FnMut(f64) -> f64,
{
    let mut eval = |x: f64| {
        let v = f(x);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let (mut a, mut b) = if lower <= upper {
        (lower, upper)
    } else {
        (upper, lower)
    };
    if b - a <= 0.0 {
        let fx = eval(a);
        return Minimum {
            x: a,
            fx,
            iterations: 1,
            converged: true,
        };
    }

    let max_iterations = config.max_iterations.max(1);
    let x_tol = config.x_tol.abs();

    // xf: best point, nfc: second best, fulc: previous second best
    let mut fulc = a + GOLDEN_MEAN * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat: f64 = 0.0;
    let mut e: f64 = 0.0;
    let mut fx = eval(xf);
    let mut num = 1;
    let mut ffulc = fx;
    let mut fnfc = fx;
    let mut xm = 0.5 * (a + b);
    let mut tol1 = SQRT_EPS * xf.abs() + x_tol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut converged = true;

    while (xf - xm).abs() > (tol2 - 0.5 * (b - a)) {
        if num >= max_iterations {
            converged = false;
            log::debug!(
                "minimize_bounded: budget of {max_iterations} evaluations exhausted at x = {xf}, bracket width {}",
                b - a
            );
            break;
        }

        let mut golden = true;

        if e.abs() > tol1 {
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                // Parabolic step
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * sign_or_one(xm - xf);
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN_MEAN * e;
        }

        let x = xf + sign_or_one(rat) * rat.abs().max(tol1);
        let fu = eval(x);
        num += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = SQRT_EPS * xf.abs() + x_tol / 3.0;
        tol2 = 2.0 * tol1;
    }

    Minimum {
        x: xf,
        fx,
        iterations: num,
        converged,
    }
}

/// Maximize `f` over `[lower, upper]`. The returned `fx` is the maximum value.
pub fn maximize_bounded<F>(mut f: F, lower: f64, upper: f64, config: &MinimizeConfig) -> Minimum
where
    F: FnMut(f64) -> f64,
{
    let m = minimize_bounded(|x| -f(x), lower, upper, config);
    Minimum { fx: -m.fx, ..m }
}

/// Sign of `v`, with zero mapped to +1.
#[inline]
fn sign_or_one(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_interior_minimum() {
        let m = minimize_bounded(|x| (x - 2.5).powi(2) + 1.0, 0.0, 10.0, &MinimizeConfig::default());
        assert!(m.converged);
        assert!((m.x - 2.5).abs() < 1e-6, "x = {}", m.x);
        assert!((m.fx - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_minimum_at_boundary_stays_inside() {
        // Monotone increasing: minimum at the lower bound
        let m = minimize_bounded(|x| x, 1.0, 3.0, &MinimizeConfig::default());
        assert!(m.converged);
        assert!(m.x > 1.0, "endpoints are never evaluated");
        assert!(m.x - 1.0 < 1e-6, "x = {}", m.x);
    }

    #[test]
    fn test_squared_residual_root() {
        // Root of sinh(x) = 3 via squared residual, as used for activation losses
        let target = 3.0_f64;
        let m = minimize_bounded(
            |x| (x.sinh() - target).powi(2),
            1e-5,
            10.0,
            &MinimizeConfig::default(),
        );
        assert!(m.converged);
        assert!((m.x - target.asinh()).abs() < 1e-6, "x = {}", m.x);
    }

    #[test]
    fn test_iteration_cap_flags_non_convergence() {
        let cfg = MinimizeConfig::new(1e-14, 5);
        let m = minimize_bounded(|x| (x - 0.123_456).powi(2), 0.0, 100.0, &cfg);
        assert!(!m.converged);
        assert_eq!(m.iterations, 5);
        assert!(m.x > 0.0 && m.x < 100.0);
    }

    #[test]
    fn test_nan_region_is_avoided() {
        let m = minimize_bounded(
            |x| if x < 1.0 { f64::NAN } else { (x - 1.5).powi(2) },
            0.0,
            4.0,
            &MinimizeConfig::default(),
        );
        assert!((m.x - 1.5).abs() < 1e-6, "x = {}", m.x);
    }

    #[test]
    fn test_reversed_and_degenerate_bounds() {
        let m = minimize_bounded(|x| (x - 1.0).powi(2), 3.0, -1.0, &MinimizeConfig::default());
        assert!((m.x - 1.0).abs() < 1e-6);

        let d = minimize_bounded(|x| x * x, 2.0, 2.0, &MinimizeConfig::default());
        assert_eq!(d.x, 2.0);
        assert_eq!(d.fx, 4.0);
        assert!(d.converged);
    }

    #[test]
    fn test_maximize_returns_maximum_value() {
        let m = maximize_bounded(|x| x * (4.0 - x), 0.0, 4.0, &MinimizeConfig::default());
        assert!((m.x - 2.0).abs() < 1e-6);
        assert!((m.fx - 4.0).abs() < 1e-12);
    }
}
