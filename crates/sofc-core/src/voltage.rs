//! Semi-empirical cell voltage model.
//!
//! Terminal voltage = OCV − ohmic − activation − concentration, with
//! Arrhenius layer conductivities and an implicit Butler–Volmer activation
//! overpotential per electrode. All quantities SI; current density in A/m².

use sofc_math::minimize::{minimize_bounded, MinimizeConfig};
use sofc_types::error::{SofcError, SofcResult};
use sofc_types::params::{Electrode, Layer, StackParameters};
use sofc_types::units::MA_PER_CM2;

/// Lower end of the default activation overpotential bracket [V].
const ACTIVATION_LOWER: f64 = 1e-5;

/// Upper end of the default activation overpotential bracket [V].
const ACTIVATION_UPPER: f64 = 10.0;

/// Bracket and tolerances for the per-electrode Butler–Volmer solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationSettings {
    /// Lower overpotential bound [V]
    pub lower: f64,
    /// Upper overpotential bound [V]
    pub upper: f64,
    pub minimizer: MinimizeConfig,
    /// Fail with `ActivationSolveNonConvergence` instead of accepting the
    /// best estimate when the iteration budget runs out.
    pub require_convergence: bool,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        ActivationSettings {
            lower: ACTIVATION_LOWER,
            upper: ACTIVATION_UPPER,
            minimizer: MinimizeConfig::new(1e-10, 200),
            require_convergence: false,
        }
    }
}

/// Outcome of one electrode's activation solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationSolve {
    /// Overpotential [V]
    pub overpotential: f64,
    /// |i0·sinh(...) − i| at the solution [A/m²]
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Every term of the voltage balance at one current density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageBreakdown {
    /// [A/m²]
    pub current_density: f64,
    pub ocv: f64,
    pub ohmic: f64,
    pub activation_anode: f64,
    pub activation_cathode: f64,
    pub concentration: f64,
    /// Terminal voltage [V]
    pub terminal: f64,
    pub activation_converged: bool,
}

impl VoltageBreakdown {
    /// Total activation loss [V].
    pub fn activation(&self) -> f64 {
        self.activation_anode + self.activation_cathode
    }

    /// Sum of all losses [V].
    pub fn total_loss(&self) -> f64 {
        self.ohmic + self.activation() + self.concentration
    }
}

/// Open-circuit (Nernst) voltage at the operating temperature and pressure [V].
///
/// `V_rev = −(ΔH − T·ΔS) / (2F)` plus the species term
/// `RT/(2F)·ln(yH2·√yO2 / yH2O)` and the pressure term `RT/(4F)·ln(P / P_ref)`.
pub fn open_circuit_voltage(params: &StackParameters) -> f64 {
    let cfg = params.config();
    let t = params.temperature();
    let f = params.faraday();
    let rt = params.gas_constant() * t;
    let e = &cfg.electrochemistry;

    let gibbs = params.enthalpy_change() - t * cfg.constants.entropy_change;
    let reversible = -gibbs / (2.0 * f);
    let species = rt / (2.0 * f) * (e.y_h2 * e.y_o2.sqrt() / e.y_h2o).ln();
    let pressure = rt / (4.0 * f) * (params.pressure() / cfg.constants.reference_pressure).ln();

    reversible + species + pressure
}

/// Σ t_k / (σ_k(T) · A) over the four conducting layers.
pub fn ohmic_resistance(params: &StackParameters) -> f64 {
    let area = params.active_area();
    Layer::ALL
        .iter()
        .map(|&layer| params.layer_thickness(layer) / (params.conductivity(layer) * area))
        .sum()
}

/// Ohmic loss [V].
pub fn ohmic_loss(params: &StackParameters, current_density: f64) -> f64 {
    current_density * ohmic_resistance(params)
}

/// Concentration loss `m · exp(n · i)` with `i` in mA/cm², the unit the
/// empirical constants are fitted in [V].
pub fn concentration_loss(params: &StackParameters, current_density: f64) -> f64 {
    let e = &params.config().electrochemistry;
    e.concentration_m * (e.concentration_n * current_density / MA_PER_CM2).exp()
}

/// Solve `i0 · sinh(ne·F·η / (2RT)) = i` for the overpotential η of one electrode
/// by minimizing the squared residual over the configured bracket.
pub fn activation_overpotential(
    params: &StackParameters,
    electrode: Electrode,
    current_density: f64,
    settings: &ActivationSettings,
) -> SofcResult<ActivationSolve> {
    let i0 = params.exchange_current_density(electrode);
    let ne = params.config().electrochemistry.electrons_transferred;
    let k = ne / (2.0 * params.thermal_voltage());

    let residual = |eta: f64| i0 * (k * eta).sinh() - current_density;
    let m = minimize_bounded(
        |eta| residual(eta).powi(2),
        settings.lower,
        settings.upper,
        &settings.minimizer,
    );

    if !m.converged {
        if settings.require_convergence {
            return Err(SofcError::ActivationSolveNonConvergence {
                electrode,
                estimate: m.x,
                iterations: m.iterations,
            });
        }
        log::debug!(
            "{electrode} activation solve at i = {current_density} A/m^2 stopped after {} evaluations; using η = {}",
            m.iterations,
            m.x
        );
    }

    Ok(ActivationSolve {
        overpotential: m.x,
        residual: residual(m.x).abs(),
        iterations: m.iterations,
        converged: m.converged,
    })
}

/// Full voltage balance at `current_density` [A/m²].
pub fn evaluate(
    params: &StackParameters,
    current_density: f64,
    settings: &ActivationSettings,
) -> SofcResult<VoltageBreakdown> {
    if !current_density.is_finite() || current_density < 0.0 {
        return Err(SofcError::InvalidRequest(format!(
            "current density must be finite and >= 0, got {current_density}"
        )));
    }

    let ocv = open_circuit_voltage(params);
    let ohmic = ohmic_loss(params, current_density);
    let anode = activation_overpotential(params, Electrode::Anode, current_density, settings)?;
    let cathode = activation_overpotential(params, Electrode::Cathode, current_density, settings)?;
    let concentration = concentration_loss(params, current_density);

    let terminal = ocv - ohmic - anode.overpotential - cathode.overpotential - concentration;

    Ok(VoltageBreakdown {
        current_density,
        ocv,
        ohmic,
        activation_anode: anode.overpotential,
        activation_cathode: cathode.overpotential,
        concentration,
        terminal,
        activation_converged: anode.converged && cathode.converged,
    })
}

/// Terminal voltage [V] with default activation settings.
pub fn voltage(params: &StackParameters, current_density: f64) -> SofcResult<f64> {
    Ok(evaluate(params, current_density, &ActivationSettings::default())?.terminal)
}
