// ─────────────────────────────────────────────────────────────────────
// SOFC Stack Core — Polarization Curve
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sampled V-i and P-i curves with the loss breakdown at each point.

use crate::voltage::{self, ActivationSettings};
use ndarray::Array1;
use sofc_types::error::{SofcError, SofcResult};
use sofc_types::params::StackParameters;

/// Polarization curve on a uniform current-density grid.
#[derive(Debug, Clone)]
pub struct PolarizationCurve {
    /// [A/m²]
    pub current_density: Array1<f64>,
    /// Terminal voltage [V]
    pub voltage: Array1<f64>,
    /// Cell power [W]
    pub power: Array1<f64>,
    pub ohmic: Array1<f64>,
    /// Anode + cathode activation overpotential [V]
    pub activation: Array1<f64>,
    pub concentration: Array1<f64>,
    /// Open-circuit voltage [V]
    pub ocv: f64,
    /// Points whose activation solve hit its budget.
    pub unconverged: usize,
}

impl PolarizationCurve {
    /// Largest sampled power and its current density.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.power
            .iter()
            .zip(self.current_density.iter())
            .filter(|(p, _)| p.is_finite())
            .max_by(|a, b| a.0.total_cmp(b.0))
            .map(|(p, i)| (*i, *p))
    }

    pub fn len(&self) -> usize {
        self.current_density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_density.is_empty()
    }
}

/// Sample `samples` points on `[i_start, i_end]` (inclusive).
pub fn polarization_curve(
    params: &StackParameters,
    i_start: f64,
    i_end: f64,
    samples: usize,
    activation: &ActivationSettings,
) -> SofcResult<PolarizationCurve> {
    if samples < 2 {
        return Err(SofcError::InvalidRequest(format!(
            "polarization curve needs at least 2 samples, got {samples}"
        )));
    }
    if !i_start.is_finite() || !i_end.is_finite() || i_start < 0.0 || i_end <= i_start {
        return Err(SofcError::InvalidRequest(format!(
            "current density range must satisfy 0 <= start < end, got [{i_start}, {i_end}]"
        )));
    }

    let current_density = Array1::linspace(i_start, i_end, samples);
    let mut voltage = Array1::zeros(samples);
    let mut power = Array1::zeros(samples);
    let mut ohmic = Array1::zeros(samples);
    let mut activation_loss = Array1::zeros(samples);
    let mut concentration = Array1::zeros(samples);
    let mut unconverged = 0;
    let area = params.active_area();

    for (k, &i) in current_density.iter().enumerate() {
        let b = voltage::evaluate(params, i, activation)?;
        voltage[k] = b.terminal;
        power[k] = b.terminal * i * area;
        ohmic[k] = b.ohmic;
        activation_loss[k] = b.activation();
        concentration[k] = b.concentration;
        if !b.activation_converged {
            unconverged += 1;
        }
    }
    if unconverged > 0 {
        log::warn!("polarization curve: {unconverged} of {samples} points with unconverged activation");
    }

    Ok(PolarizationCurve {
        current_density,
        voltage,
        power,
        ohmic,
        activation: activation_loss,
        concentration,
        ocv: voltage::open_circuit_voltage(params),
        unconverged,
    })
}
