//! Power-matching solver.
//!
//! Inverts the cell power curve `P(i) = V(i) · i · A`: given a target power,
//! finds the current density on the rising (stable) branch of the curve by
//! bounded minimization of `(P_target − P(i))²`. The voltage model embeds its
//! own inner minimization, so `P(i)` is only piecewise smooth and the search
//! stays derivative-free.

use crate::voltage::{self, ActivationSettings};
use sofc_math::minimize::{maximize_bounded, minimize_bounded, MinimizeConfig};
use sofc_types::error::{SofcError, SofcResult};
use sofc_types::params::StackParameters;
use sofc_types::units::ma_per_cm2_to_si;

/// Search interval, tolerances and inner-solve settings for the power match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Lower current density bound [A/m²]
    pub current_density_min: f64,
    /// Upper current density bound [A/m²]
    pub current_density_max: f64,
    pub minimizer: MinimizeConfig,
    /// Accepted |P_target − P(i)| relative to the target.
    pub power_rel_tol: f64,
    pub activation: ActivationSettings,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            current_density_min: ma_per_cm2_to_si(0.1),
            current_density_max: ma_per_cm2_to_si(1200.0),
            minimizer: MinimizeConfig::new(1e-9, 500),
            power_rel_tol: 1e-6,
            activation: ActivationSettings::default(),
        }
    }
}

impl SolverSettings {
    fn validate(&self) -> SofcResult<()> {
        let lo = self.current_density_min;
        let hi = self.current_density_max;
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || hi <= lo {
            return Err(SofcError::InvalidRequest(format!(
                "current density bounds must satisfy 0 < min < max, got [{lo}, {hi}]"
            )));
        }
        if !self.power_rel_tol.is_finite() || self.power_rel_tol <= 0.0 {
            return Err(SofcError::InvalidRequest(format!(
                "power_rel_tol must be finite and > 0, got {}",
                self.power_rel_tol
            )));
        }
        Ok(())
    }
}

/// Maximum of the cell power curve over the search interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakPower {
    /// [A/m²]
    pub current_density: f64,
    /// [W]
    pub power: f64,
    pub converged: bool,
}

/// Solution of a power-matching request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerMatch {
    /// [A/m²]
    pub current_density: f64,
    /// Power delivered at `current_density` [W]
    pub power: f64,
    /// |P_target − P(i)| [W]
    pub residual: f64,
    /// Peak of the power curve; not searched for a zero target.
    pub peak: Option<PeakPower>,
    pub iterations: usize,
    pub converged: bool,
}

/// Cell power `V(i) · i · A` [W].
pub fn cell_power(
    params: &StackParameters,
    current_density: f64,
    activation: &ActivationSettings,
) -> SofcResult<f64> {
    let breakdown = voltage::evaluate(params, current_density, activation)?;
    Ok(breakdown.terminal * current_density * params.active_area())
}

/// Locate the peak of the cell power curve.
pub fn peak_power(params: &StackParameters, settings: &SolverSettings) -> SofcResult<PeakPower> {
    settings.validate()?;

    let mut failure: Option<SofcError> = None;
    let m = maximize_bounded(
        |i| match cell_power(params, i, &settings.activation) {
            Ok(p) => p,
            Err(e) => {
                failure.get_or_insert(e);
                f64::NAN
            }
        },
        settings.current_density_min,
        settings.current_density_max,
        &settings.minimizer,
    );
    if let Some(e) = failure {
        return Err(e);
    }
    if !m.converged {
        log::warn!("peak power search hit its evaluation budget; best i = {} A/m^2", m.x);
    }

    Ok(PeakPower {
        current_density: m.x,
        power: m.fx,
        converged: m.converged,
    })
}

/// Find the current density at which the cell delivers `target_power` [W].
///
/// A zero target returns zero current without searching the curve. Targets
/// below the power at the lower current bound are matched on `[0, i_min]`,
/// where the curve rises from `P(0) = 0`; the rest on `[i_min, i_peak]`.
/// Only targets above the peak fail with `InfeasiblePowerRequest`.
pub fn solve_current_density(
    params: &StackParameters,
    target_power: f64,
    settings: &SolverSettings,
) -> SofcResult<PowerMatch> {
    if !target_power.is_finite() || target_power < 0.0 {
        return Err(SofcError::InvalidRequest(format!(
            "required power must be finite and >= 0, got {target_power}"
        )));
    }
    settings.validate()?;

    if target_power == 0.0 {
        return Ok(PowerMatch {
            current_density: 0.0,
            power: 0.0,
            residual: 0.0,
            peak: None,
            iterations: 0,
            converged: true,
        });
    }

    let peak = peak_power(params, settings)?;
    let tolerance = settings.power_rel_tol * target_power;
    if target_power - peak.power > tolerance {
        return Err(SofcError::InfeasiblePowerRequest {
            requested: target_power,
            min_power: 0.0,
            max_power: peak.power,
        });
    }

    let floor = cell_power(params, settings.current_density_min, &settings.activation)?;
    let (lower, upper) = if target_power < floor {
        (0.0, settings.current_density_min)
    } else {
        (settings.current_density_min, peak.current_density)
    };

    let mut failure: Option<SofcError> = None;
    let m = minimize_bounded(
        |i| match cell_power(params, i, &settings.activation) {
            Ok(p) => (target_power - p).powi(2),
            Err(e) => {
                failure.get_or_insert(e);
                f64::NAN
            }
        },
        lower,
        upper,
        &settings.minimizer,
    );
    if let Some(e) = failure {
        return Err(e);
    }

    let power = cell_power(params, m.x, &settings.activation)?;
    let residual = (target_power - power).abs();
    if residual > tolerance {
        return Err(SofcError::InfeasiblePowerRequest {
            requested: target_power,
            min_power: 0.0,
            max_power: peak.power,
        });
    }

    if !m.converged {
        log::warn!(
            "power match for {target_power} W hit its evaluation budget; residual {residual} W is within tolerance"
        );
    }
    log::debug!(
        "power match: {target_power} W at i = {} A/m^2 on [{lower}, {upper}] after {} evaluations (residual {residual} W)",
        m.x,
        m.iterations
    );

    Ok(PowerMatch {
        current_density: m.x,
        power,
        residual,
        peak: Some(peak),
        iterations: m.iterations,
        converged: m.converged,
    })
}
