// ─────────────────────────────────────────────────────────────────────
// SOFC Stack Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// Operating point produced by one discharge evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// [A/m²]
    pub current_density: f64,
    /// Terminal cell voltage [V]
    pub voltage: f64,
    /// Matched cell power times cell count [W]
    pub power: f64,
    /// Voltage over ideal voltage [-]
    pub efficiency: f64,
    pub number_of_cells: u64,
    /// [kg/s]
    pub mdot_fuel_total: f64,
    /// [kg/s]
    pub mdot_fuel_consumed: f64,
    /// [kg/s]
    pub mdot_fuel_not_consumed: f64,
    /// [kg/s]
    pub mdot_air_total: f64,
    /// Rejected heat [W]
    pub heat_out: f64,
    /// False when an activation overpotential is a best estimate only.
    pub activation_converged: bool,
}

/// Algebraic stack sizing for a required power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// [W]
    pub required_power: f64,
    pub number_of_cells: u64,
    pub number_of_channels_per_cell: u64,
    /// [m³]
    pub volume: f64,
    /// [kg]
    pub mass: f64,
}

/// Stack sized on the peak power a single cell can deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakPowerSizing {
    /// [W]
    pub required_power: f64,
    /// Current density at peak cell power [A/m²]
    pub peak_current_density: f64,
    /// Peak power of one cell [W]
    pub power_per_cell: f64,
    pub number_of_cells: u64,
    /// Cell count times peak cell power [W]
    pub max_power: f64,
    /// [m³]
    pub volume: f64,
    /// Porosity-corrected mass [kg]
    pub mass: f64,
    /// [kg/m³]
    pub mass_density: f64,
    /// [W/kg]
    pub specific_power: f64,
}
