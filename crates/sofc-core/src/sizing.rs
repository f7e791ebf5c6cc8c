//! Stack sizing.
//!
//! Two procedures. `size` is direct algebra on the design power per cell;
//! `size_from_peak_power` first finds the peak power one cell can deliver and
//! builds the stack from that.

use crate::solver::{self, SolverSettings};
use sofc_types::error::{SofcError, SofcResult};
use sofc_types::params::StackParameters;
use sofc_types::state::{PeakPowerSizing, SizingResult};

fn require_power(required_power: f64) -> SofcResult<()> {
    if !required_power.is_finite() || required_power < 0.0 {
        return Err(SofcError::InvalidRequest(format!(
            "required power must be finite and >= 0, got {required_power}"
        )));
    }
    Ok(())
}

/// Integral cell count; counts beyond `u64` are rejected rather than saturated.
fn checked_count(count: f64, required_power: f64) -> SofcResult<u64> {
    if count >= u64::MAX as f64 {
        return Err(SofcError::InvalidRequest(format!(
            "required power {required_power} W needs {count:e} cells, more than a stack can count"
        )));
    }
    Ok(count as u64)
}

/// Number of cells for `required_power`: `round(P / power_per_cell)`.
///
/// Shared by sizing and discharge so both always report the same stack.
pub fn cell_count(params: &StackParameters, required_power: f64) -> SofcResult<u64> {
    require_power(required_power)?;
    checked_count(
        (required_power / params.power_per_cell()).round(),
        required_power,
    )
}

/// Parallel flow channels per cell: `round(total_channel_width / channel_width)`.
pub fn channels_per_cell(params: &StackParameters) -> u64 {
    let g = &params.config().geometry;
    (g.total_channel_width / g.channel_width).round() as u64
}

/// Algebraic sizing at fixed geometry.
pub fn size(params: &StackParameters, required_power: f64) -> SofcResult<SizingResult> {
    let number_of_cells = cell_count(params, required_power)?;
    let g = &params.config().geometry;

    let volume =
        number_of_cells as f64 * g.channel_length * g.total_channel_width * g.channel_height;
    let mass = volume * params.cell_density();

    Ok(SizingResult {
        required_power,
        number_of_cells,
        number_of_channels_per_cell: channels_per_cell(params),
        volume,
        mass,
    })
}

/// Size the stack on the peak power of a single cell.
///
/// `N = ceil(P / P_peak)`, volume `N · A · t_total`, porosity-corrected mass.
/// `mass_density` and `specific_power` are per-cell ratios, equal to
/// `mass / volume` and `max_power / mass` for `N > 0` and still defined
/// for a zero request.
pub fn size_from_peak_power(
    params: &StackParameters,
    required_power: f64,
    settings: &SolverSettings,
) -> SofcResult<PeakPowerSizing> {
    require_power(required_power)?;

    let peak = solver::peak_power(params, settings)?;
    if peak.power <= 0.0 {
        return Err(SofcError::InfeasiblePowerRequest {
            requested: required_power,
            min_power: 0.0,
            max_power: peak.power,
        });
    }

    let number_of_cells = checked_count((required_power / peak.power).ceil(), required_power)?;
    let max_power = number_of_cells as f64 * peak.power;

    let porosity = params.config().materials.porosity_coefficient;
    let cell_volume = params.active_area() * params.total_thickness();
    let cell_mass = cell_volume * params.cell_density() * porosity;

    let volume = number_of_cells as f64 * cell_volume;
    let mass = number_of_cells as f64 * cell_mass;

    Ok(PeakPowerSizing {
        required_power,
        peak_current_density: peak.current_density,
        power_per_cell: peak.power,
        number_of_cells,
        max_power,
        volume,
        mass,
        mass_density: cell_mass / cell_volume,
        specific_power: peak.power / cell_mass,
    })
}
