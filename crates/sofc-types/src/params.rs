//! Validated, immutable stack parameters.
//!
//! `StackParameters` is built once from a [`StackConfig`], checks every
//! physical invariant up front, and caches the derived quantities the
//! voltage model and sizing need (active area, wall thickness, composite
//! density, reaction enthalpy, ideal voltage). Nothing mutates it afterwards,
//! so one value can be shared across threads for concurrent solves.

use crate::config::{ArrheniusConductivity, ExchangeCurrentModel, StackConfig};
use crate::error::{SofcError, SofcResult};

/// Electrode of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Electrode {
    Anode,
    Cathode,
}

impl std::fmt::Display for Electrode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Electrode::Anode => write!(f, "anode"),
            Electrode::Cathode => write!(f, "cathode"),
        }
    }
}

/// Conducting layer of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Anode,
    Cathode,
    Electrolyte,
    Interconnect,
}

impl Layer {
    pub const ALL: [Layer; 4] = [
        Layer::Anode,
        Layer::Cathode,
        Layer::Electrolyte,
        Layer::Interconnect,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackParameters {
    config: StackConfig,
    active_area: f64,
    total_thickness: f64,
    cell_density: f64,
    enthalpy_change: f64,
    ideal_voltage: f64,
}

fn require_positive(name: &str, value: f64) -> SofcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SofcError::InvalidParameters(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> SofcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SofcError::InvalidParameters(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

fn require_fraction(name: &str, value: f64) -> SofcResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(SofcError::InvalidParameters(format!(
            "{name} must lie in (0, 1], got {value}"
        )));
    }
    Ok(())
}

fn validate_conductivity(name: &str, law: &ArrheniusConductivity) -> SofcResult<()> {
    require_positive(&format!("{name}.pre_exponential"), law.pre_exponential)?;
    if !law.activation_temperature.is_finite() {
        return Err(SofcError::InvalidParameters(format!(
            "{name}.activation_temperature must be finite, got {}",
            law.activation_temperature
        )));
    }
    Ok(())
}

fn validate(config: &StackConfig) -> SofcResult<()> {
    let c = &config.constants;
    require_positive("constants.faraday", c.faraday)?;
    require_positive("constants.gas_constant", c.gas_constant)?;
    require_positive("constants.lhv", c.lhv)?;
    require_positive("constants.m_h2", c.m_h2)?;
    require_positive("constants.m_o2", c.m_o2)?;
    require_positive("constants.m_h2o", c.m_h2o)?;
    require_positive("constants.m_n2", c.m_n2)?;
    require_positive("constants.reference_pressure", c.reference_pressure)?;
    if !c.entropy_change.is_finite() {
        return Err(SofcError::InvalidParameters(format!(
            "constants.entropy_change must be finite, got {}",
            c.entropy_change
        )));
    }

    let g = &config.geometry;
    require_positive("geometry.anode_thickness", g.anode_thickness)?;
    require_positive("geometry.cathode_thickness", g.cathode_thickness)?;
    require_positive("geometry.electrolyte_thickness", g.electrolyte_thickness)?;
    require_positive("geometry.interconnect_thickness", g.interconnect_thickness)?;
    require_non_negative("geometry.additional_thickness", g.additional_thickness)?;
    require_positive("geometry.channel_height", g.channel_height)?;
    require_positive("geometry.channel_length", g.channel_length)?;
    require_positive("geometry.channel_width", g.channel_width)?;
    require_positive("geometry.total_channel_width", g.total_channel_width)?;
    require_non_negative(
        "geometry.interconnect_contact_width",
        g.interconnect_contact_width,
    )?;
    require_positive("geometry.geometric_area", g.geometric_area)?;
    require_positive("geometry.active_area_ratio", g.active_area_ratio)?;

    let m = &config.materials;
    require_positive("materials.anode_density", m.anode_density)?;
    require_positive("materials.cathode_density", m.cathode_density)?;
    require_positive("materials.electrolyte_density", m.electrolyte_density)?;
    require_positive("materials.interconnect_density", m.interconnect_density)?;
    require_fraction("materials.porosity_coefficient", m.porosity_coefficient)?;

    let k = &config.conductivity;
    validate_conductivity("conductivity.anode", &k.anode)?;
    validate_conductivity("conductivity.cathode", &k.cathode)?;
    validate_conductivity("conductivity.electrolyte", &k.electrolyte)?;
    validate_conductivity("conductivity.interconnect", &k.interconnect)?;

    let e = &config.electrochemistry;
    require_fraction("electrochemistry.y_h2", e.y_h2)?;
    require_fraction("electrochemistry.y_o2", e.y_o2)?;
    require_fraction("electrochemistry.y_h2o", e.y_h2o)?;
    for (name, kinetics) in [("anode", &e.anode), ("cathode", &e.cathode)] {
        require_positive(
            &format!("electrochemistry.{name}.exchange_current_density"),
            kinetics.exchange_current_density,
        )?;
        require_positive(
            &format!("electrochemistry.{name}.pre_exponential"),
            kinetics.pre_exponential,
        )?;
        require_non_negative(
            &format!("electrochemistry.{name}.activation_energy"),
            kinetics.activation_energy,
        )?;
    }
    require_positive(
        "electrochemistry.electrons_transferred",
        e.electrons_transferred,
    )?;
    require_non_negative("electrochemistry.concentration_m", e.concentration_m)?;
    require_non_negative("electrochemistry.concentration_n", e.concentration_n)?;

    let o = &config.operating;
    require_positive("operating.temperature", o.temperature)?;
    require_positive("operating.pressure", o.pressure)?;
    require_fraction("operating.fuel_utilization", o.fuel_utilization)?;

    require_positive("sizing.power_per_cell", config.sizing.power_per_cell)?;
    if let Some(v) = config.sizing.ideal_voltage {
        require_positive("sizing.ideal_voltage", v)?;
    }
    Ok(())
}

impl StackParameters {
    /// Validate `config` and compute the derived quantities.
    pub fn new(config: StackConfig) -> SofcResult<Self> {
        validate(&config)?;

        let g = &config.geometry;
        let m = &config.materials;
        let c = &config.constants;

        let active_area = g.active_area_ratio * g.geometric_area;
        let total_thickness = g.anode_thickness
            + g.cathode_thickness
            + g.electrolyte_thickness
            + g.interconnect_thickness
            + 2.0 * g.channel_height
            + g.additional_thickness;

        // Thickness-weighted layer mass smeared over the full wall thickness
        let cell_density = (m.anode_density * g.anode_thickness
            + m.cathode_density * g.cathode_thickness
            + m.electrolyte_density * g.electrolyte_thickness
            + m.interconnect_density * g.interconnect_thickness)
            / total_thickness;

        let enthalpy_change = -c.lhv * c.m_h2;
        let ideal_voltage = config
            .sizing
            .ideal_voltage
            .unwrap_or(-enthalpy_change / (2.0 * c.faraday));

        Ok(StackParameters {
            config,
            active_area,
            total_thickness,
            cell_density,
            enthalpy_change,
            ideal_voltage,
        })
    }

    /// Same design at a different operating temperature [K] and pressure [Pa].
    pub fn with_operating_conditions(&self, temperature: f64, pressure: f64) -> SofcResult<Self> {
        let mut config = self.config.clone();
        config.operating.temperature = temperature;
        config.operating.pressure = pressure;
        Self::new(config)
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Electrochemically active area [m²].
    pub fn active_area(&self) -> f64 {
        self.active_area
    }

    /// Total cell wall thickness including both flow channels [m].
    pub fn total_thickness(&self) -> f64 {
        self.total_thickness
    }

    /// Composite cell density [kg/m³].
    pub fn cell_density(&self) -> f64 {
        self.cell_density
    }

    /// Reaction enthalpy change ΔH = −LHV · M_H2 [J/mol].
    pub fn enthalpy_change(&self) -> f64 {
        self.enthalpy_change
    }

    /// Reference voltage for efficiency [V].
    pub fn ideal_voltage(&self) -> f64 {
        self.ideal_voltage
    }

    pub fn faraday(&self) -> f64 {
        self.config.constants.faraday
    }

    pub fn gas_constant(&self) -> f64 {
        self.config.constants.gas_constant
    }

    pub fn temperature(&self) -> f64 {
        self.config.operating.temperature
    }

    pub fn pressure(&self) -> f64 {
        self.config.operating.pressure
    }

    pub fn fuel_utilization(&self) -> f64 {
        self.config.operating.fuel_utilization
    }

    pub fn power_per_cell(&self) -> f64 {
        self.config.sizing.power_per_cell
    }

    /// R·T / F at the operating temperature [V].
    pub fn thermal_voltage(&self) -> f64 {
        self.gas_constant() * self.temperature() / self.faraday()
    }

    pub fn layer_thickness(&self, layer: Layer) -> f64 {
        let g = &self.config.geometry;
        match layer {
            Layer::Anode => g.anode_thickness,
            Layer::Cathode => g.cathode_thickness,
            Layer::Electrolyte => g.electrolyte_thickness,
            Layer::Interconnect => g.interconnect_thickness,
        }
    }

    /// Layer conductivity at the operating temperature [S/m].
    pub fn conductivity(&self, layer: Layer) -> f64 {
        let k = &self.config.conductivity;
        let law = match layer {
            Layer::Anode => &k.anode,
            Layer::Cathode => &k.cathode,
            Layer::Electrolyte => &k.electrolyte,
            Layer::Interconnect => &k.interconnect,
        };
        law.at(self.temperature())
    }

    /// Exchange current density of `electrode` [A/m²] under the configured model.
    pub fn exchange_current_density(&self, electrode: Electrode) -> f64 {
        let e = &self.config.electrochemistry;
        let kinetics = match electrode {
            Electrode::Anode => &e.anode,
            Electrode::Cathode => &e.cathode,
        };
        match e.exchange_current_model {
            ExchangeCurrentModel::Fixed => kinetics.exchange_current_density,
            ExchangeCurrentModel::Arrhenius => {
                kinetics.pre_exponential
                    * (-kinetics.activation_energy / (self.gas_constant() * self.temperature()))
                        .exp()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> StackParameters {
        StackParameters::new(StackConfig::default()).unwrap()
    }

    #[test]
    fn test_reference_design_is_valid() {
        let p = reference();
        assert!((p.active_area() - 10_000.0).abs() < 1e-9);
        // 0.0009 + 0.00006 + 0.000015 + 0.01 + 2·0.001 + 0.01
        assert!((p.total_thickness() - 0.022_975).abs() < 1e-12);
    }

    #[test]
    fn test_cell_density_is_thickness_weighted() {
        let p = reference();
        let expected = (4800.0 * 9.0e-4 + 4600.0 * 6.0e-5 + 6000.0 * 1.5e-5 + 7800.0 * 0.01)
            / 0.022_975;
        assert!((p.cell_density() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_ideal_voltage_is_lhv_based() {
        let p = reference();
        // 120 MJ/kg · 2.01568 g/mol / (2F) ≈ 1.2535 V
        assert!((p.ideal_voltage() - 1.2535).abs() < 1e-3);
        assert!((p.enthalpy_change() + 241_881.6).abs() < 1e-6);
    }

    #[test]
    fn test_ideal_voltage_override() {
        let mut cfg = StackConfig::default();
        cfg.sizing.ideal_voltage = Some(1.25);
        let p = StackParameters::new(cfg).unwrap();
        assert!((p.ideal_voltage() - 1.25).abs() < 1e-15);
    }

    #[test]
    fn test_rejects_non_positive_thickness() {
        let mut cfg = StackConfig::default();
        cfg.geometry.electrolyte_thickness = 0.0;
        let err = StackParameters::new(cfg).unwrap_err();
        match err {
            SofcError::InvalidParameters(msg) => assert!(msg.contains("electrolyte_thickness")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_fuel_utilization_outside_unit_interval() {
        for bad in [0.0, -0.2, 1.01, f64::NAN] {
            let mut cfg = StackConfig::default();
            cfg.operating.fuel_utilization = bad;
            assert!(
                matches!(
                    StackParameters::new(cfg),
                    Err(SofcError::InvalidParameters(_))
                ),
                "fuel utilization {bad} should be rejected"
            );
        }
        let mut cfg = StackConfig::default();
        cfg.operating.fuel_utilization = 1.0;
        assert!(StackParameters::new(cfg).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_temperature_and_pressure() {
        let p = reference();
        assert!(p.with_operating_conditions(0.0, 2.0e6).is_err());
        assert!(p.with_operating_conditions(1173.0, -1.0).is_err());
        assert!(p.with_operating_conditions(f64::INFINITY, 2.0e6).is_err());
    }

    #[test]
    fn test_rejects_non_positive_density_and_conductivity() {
        let mut cfg = StackConfig::default();
        cfg.materials.interconnect_density = -7800.0;
        assert!(StackParameters::new(cfg).is_err());

        let mut cfg = StackConfig::default();
        cfg.conductivity.cathode.pre_exponential = 0.0;
        assert!(StackParameters::new(cfg).is_err());
    }

    #[test]
    fn test_with_operating_conditions_keeps_design() {
        let p = reference();
        let q = p.with_operating_conditions(1073.0, 1.0e6).unwrap();
        assert!((q.temperature() - 1073.0).abs() < 1e-12);
        assert!((q.pressure() - 1.0e6).abs() < 1e-6);
        assert_eq!(p.config().geometry, q.config().geometry);
        assert!((p.active_area() - q.active_area()).abs() < 1e-12);
        // Receiver is untouched
        assert!((p.temperature() - 1173.0).abs() < 1e-12);
    }

    #[test]
    fn test_conductivity_rises_with_temperature() {
        let cold = reference().with_operating_conditions(973.0, 2.0e6).unwrap();
        let hot = reference();
        assert!(hot.conductivity(Layer::Electrolyte) > cold.conductivity(Layer::Electrolyte));
    }

    #[test]
    fn test_exchange_current_models() {
        let p = reference();
        assert!((p.exchange_current_density(Electrode::Anode) - 5300.0).abs() < 1e-12);
        assert!((p.exchange_current_density(Electrode::Cathode) - 2000.0).abs() < 1e-12);

        let mut cfg = StackConfig::default();
        cfg.electrochemistry.exchange_current_model = ExchangeCurrentModel::Arrhenius;
        let q = StackParameters::new(cfg).unwrap();
        let rt = q.gas_constant() * q.temperature();
        let expected = 5.5e8 * (-100_000.0 / rt).exp();
        assert!((q.exchange_current_density(Electrode::Anode) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_parameters_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StackParameters>();
    }

    #[test]
    fn test_electrode_tag_display_and_error_path() {
        assert_eq!(Electrode::Anode.to_string(), "anode");
        assert_eq!(Electrode::Cathode.to_string(), "cathode");
        let err = SofcError::ActivationSolveNonConvergence {
            electrode: crate::error::Electrode::Cathode,
            estimate: 0.1,
            iterations: 3,
        };
        assert!(err.to_string().contains("cathode"));
    }
}
