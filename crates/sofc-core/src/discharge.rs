//! Discharge evaluation: operating point for a required power.
//!
//! Solves the current density for the requested power, evaluates the voltage
//! there, and derives stack power, efficiency, rejected heat and reactant flows
//! from Faraday's law.

use crate::sizing::cell_count;
use crate::solver::{solve_current_density, SolverSettings};
use crate::voltage;
use rayon::prelude::*;
use sofc_types::constants::O2_MASS_FRACTION_AIR;
use sofc_types::error::{SofcError, SofcResult};
use sofc_types::params::StackParameters;
use sofc_types::state::OperatingPoint;

/// Reactant mass flows at a current density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactantFlows {
    /// Fuel supplied [kg/s]
    pub fuel_total: f64,
    /// Fuel reacted [kg/s]
    pub fuel_consumed: f64,
    /// Fuel leaving unreacted [kg/s]
    pub fuel_not_consumed: f64,
    /// Oxygen reacted [kg/s]
    pub oxygen: f64,
    /// Air supplied [kg/s]
    pub air_total: f64,
}

/// Faraday's-law reactant flows through the active area at `current_density`.
pub fn reactant_flows(params: &StackParameters, current_density: f64) -> ReactantFlows {
    let c = &params.config().constants;
    let f = params.faraday();
    let u = params.fuel_utilization();
    let current = current_density * params.active_area();

    let fuel_total = current * c.m_h2 / (2.0 * f * u);
    let fuel_consumed = fuel_total * u;
    let oxygen = current * c.m_o2 / (4.0 * f);

    ReactantFlows {
        fuel_total,
        fuel_consumed,
        fuel_not_consumed: fuel_total - fuel_consumed,
        oxygen,
        air_total: oxygen / O2_MASS_FRACTION_AIR,
    }
}

/// Operating point delivering `required_power` [W].
pub fn discharge(
    params: &StackParameters,
    required_power: f64,
    settings: &SolverSettings,
) -> SofcResult<OperatingPoint> {
    let matched = solve_current_density(params, required_power, settings)?;
    let current_density = matched.current_density;

    let breakdown = voltage::evaluate(params, current_density, &settings.activation)?;
    let v = breakdown.terminal;
    if v <= 0.0 {
        return Err(SofcError::NonPhysicalVoltage {
            current_density,
            voltage: v,
        });
    }
    if !breakdown.activation_converged {
        log::warn!(
            "activation overpotential at i = {current_density} A/m^2 is an unconverged estimate"
        );
    }

    let number_of_cells = cell_count(params, required_power)?;
    let power = v * current_density * params.active_area() * number_of_cells as f64;
    let efficiency = v / params.ideal_voltage();
    let heat_out = power * (1.0 - efficiency) / efficiency;
    let flows = reactant_flows(params, current_density);

    Ok(OperatingPoint {
        current_density,
        voltage: v,
        power,
        efficiency,
        number_of_cells,
        mdot_fuel_total: flows.fuel_total,
        mdot_fuel_consumed: flows.fuel_consumed,
        mdot_fuel_not_consumed: flows.fuel_not_consumed,
        mdot_air_total: flows.air_total,
        heat_out,
        activation_converged: breakdown.activation_converged,
    })
}

/// Evaluate independent power requests in parallel, one result per request.
pub fn discharge_batch(
    params: &StackParameters,
    required_powers: &[f64],
    settings: &SolverSettings,
) -> Vec<SofcResult<OperatingPoint>> {
    required_powers
        .par_iter()
        .map(|&p| discharge(params, p, settings))
        .collect()
}
