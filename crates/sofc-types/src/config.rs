// ─────────────────────────────────────────────────────────────────────
// SOFC Stack Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants;
use crate::error::SofcResult;
use serde::{Deserialize, Serialize};

/// Top-level stack configuration.
///
/// Every section falls back to the reference planar SOFC design when absent,
/// so an empty JSON object `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub constants: ConstantsConfig,
    pub geometry: GeometryConfig,
    pub materials: MaterialsConfig,
    pub conductivity: ConductivityConfig,
    pub electrochemistry: ElectrochemistryConfig,
    pub operating: OperatingConfig,
    pub sizing: SizingConfig,
}

/// Physical constants. Overridable so that calibration studies can perturb them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantsConfig {
    /// Faraday constant [C/mol]
    pub faraday: f64,
    /// Gas constant [J/(mol K)]
    pub gas_constant: f64,
    /// Fuel lower heating value [J/kg]
    pub lhv: f64,
    /// Molar mass of H2 [kg/mol]
    pub m_h2: f64,
    /// Molar mass of O2 [kg/mol]
    pub m_o2: f64,
    /// Molar mass of H2O [kg/mol]
    pub m_h2o: f64,
    /// Molar mass of N2 [kg/mol]
    pub m_n2: f64,
    /// Reaction entropy change [J/(mol K)]
    pub entropy_change: f64,
    /// Nernst reference pressure [Pa]
    pub reference_pressure: f64,
}

impl Default for ConstantsConfig {
    fn default() -> Self {
        ConstantsConfig {
            faraday: constants::FARADAY,
            gas_constant: constants::GAS_CONSTANT,
            lhv: constants::LHV_H2,
            m_h2: constants::M_H2,
            m_o2: constants::M_O2,
            m_h2o: constants::M_H2O,
            m_n2: constants::M_N2,
            entropy_change: constants::ENTROPY_CHANGE,
            reference_pressure: constants::P_REFERENCE,
        }
    }
}

/// Cell and flow-channel geometry, all lengths in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub anode_thickness: f64,
    pub cathode_thickness: f64,
    pub electrolyte_thickness: f64,
    pub interconnect_thickness: f64,
    /// Extra wall thickness outside the membrane-electrode assembly.
    pub additional_thickness: f64,
    pub channel_height: f64,
    pub channel_length: f64,
    pub channel_width: f64,
    /// Summed width of all flow channels of one cell.
    pub total_channel_width: f64,
    pub interconnect_contact_width: f64,
    /// Geometric (interface) area [m²]
    pub geometric_area: f64,
    /// Active area per unit geometric area [-]
    pub active_area_ratio: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            anode_thickness: 9.0e-4,
            cathode_thickness: 6.0e-5,
            electrolyte_thickness: 1.5e-5,
            interconnect_thickness: 0.01,
            additional_thickness: 0.01,
            channel_height: 0.001,
            channel_length: 10.0,
            channel_width: 0.005,
            total_channel_width: 1000.0,
            interconnect_contact_width: 2.0e-5,
            geometric_area: 20.0,
            active_area_ratio: 500.0,
        }
    }
}

/// Layer densities [kg/m³] and stack porosity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    /// Ni-YSZ
    pub anode_density: f64,
    /// LSM
    pub cathode_density: f64,
    /// YSZ
    pub electrolyte_density: f64,
    /// Iron-based
    pub interconnect_density: f64,
    pub porosity_coefficient: f64,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        MaterialsConfig {
            anode_density: 4800.0,
            cathode_density: 4600.0,
            electrolyte_density: 6000.0,
            interconnect_density: 7800.0,
            porosity_coefficient: 0.6,
        }
    }
}

/// Temperature-dependent conductivity `σ(T) = A · T^(−k) · exp(−B / T)` [S/m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusConductivity {
    /// Pre-exponential factor A
    pub pre_exponential: f64,
    /// Activation temperature B [K]
    pub activation_temperature: f64,
    /// Temperature exponent k
    #[serde(default)]
    pub temperature_exponent: i32,
}

impl ArrheniusConductivity {
    pub fn new(pre_exponential: f64, activation_temperature: f64, temperature_exponent: i32) -> Self {
        ArrheniusConductivity {
            pre_exponential,
            activation_temperature,
            temperature_exponent,
        }
    }

    /// Conductivity at `temperature` [K].
    pub fn at(&self, temperature: f64) -> f64 {
        self.pre_exponential
            * temperature.powi(-self.temperature_exponent)
            * (-self.activation_temperature / temperature).exp()
    }
}

/// Conductivity laws of the four conducting layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConductivityConfig {
    pub anode: ArrheniusConductivity,
    pub cathode: ArrheniusConductivity,
    pub electrolyte: ArrheniusConductivity,
    pub interconnect: ArrheniusConductivity,
}

impl Default for ConductivityConfig {
    fn default() -> Self {
        ConductivityConfig {
            anode: ArrheniusConductivity::new(95.0e6, 1150.0, 1),
            cathode: ArrheniusConductivity::new(42.0e6, 1200.0, 1),
            electrolyte: ArrheniusConductivity::new(33_400.0, 10_300.0, 0),
            interconnect: ArrheniusConductivity::new(9.3e6, 1100.0, 1),
        }
    }
}

/// How electrode exchange current densities are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeCurrentModel {
    /// Use the configured `exchange_current_density` directly.
    #[default]
    Fixed,
    /// Selimovic form `i0 = γ · exp(−E_act / (R T))`.
    Arrhenius,
}

/// Butler–Volmer kinetics of one electrode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectrodeKinetics {
    /// Exchange current density i0 [A/m²]
    pub exchange_current_density: f64,
    /// Pre-exponential factor γ [A/m²]
    pub pre_exponential: f64,
    /// Activation energy [J/mol]
    pub activation_energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectrochemistryConfig {
    /// Mean mole fraction of H2 in the anode stream
    pub y_h2: f64,
    /// Mean mole fraction of O2 in the cathode stream
    pub y_o2: f64,
    /// Mean mole fraction of H2O in the anode stream
    pub y_h2o: f64,
    pub anode: ElectrodeKinetics,
    pub cathode: ElectrodeKinetics,
    /// Electrons transferred in the rate-determining step
    pub electrons_transferred: f64,
    pub exchange_current_model: ExchangeCurrentModel,
    /// Concentration-loss amplitude m [V]
    pub concentration_m: f64,
    /// Concentration-loss exponent n [cm²/mA]
    pub concentration_n: f64,
}

impl Default for ElectrochemistryConfig {
    fn default() -> Self {
        ElectrochemistryConfig {
            y_h2: 0.5,
            y_o2: 0.15,
            y_h2o: 0.5,
            anode: ElectrodeKinetics {
                exchange_current_density: 5300.0,
                pre_exponential: 5.5e8,
                activation_energy: 100_000.0,
            },
            cathode: ElectrodeKinetics {
                exchange_current_density: 2000.0,
                pre_exponential: 7.0e8,
                activation_energy: 117_000.0,
            },
            electrons_transferred: 1.0,
            exchange_current_model: ExchangeCurrentModel::Fixed,
            concentration_m: 3.0e-5,
            concentration_n: 8.0e-3,
        }
    }
}

/// Operating point environment. Temperature and pressure are uniform over the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingConfig {
    /// [K]
    pub temperature: f64,
    /// [Pa]
    pub pressure: f64,
    /// Fraction of supplied fuel that reacts, in (0, 1]
    pub fuel_utilization: f64,
}

impl Default for OperatingConfig {
    fn default() -> Self {
        OperatingConfig {
            temperature: 1173.0,
            pressure: 2.0e6,
            fuel_utilization: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Design power delivered by one cell [W]
    pub power_per_cell: f64,
    /// Reference voltage for efficiency. When absent the LHV-based
    /// thermoneutral voltage −ΔH/(2F) is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal_voltage: Option<f64>,
}

impl Default for SizingConfig {
    fn default() -> Self {
        SizingConfig {
            power_per_cell: 2000.0,
            ideal_voltage: None,
        }
    }
}

impl StackConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> SofcResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse from a JSON string. Missing sections and fields take defaults.
    pub fn from_json_str(json: &str) -> SofcResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> SofcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SofcError;

    #[test]
    fn test_empty_json_is_reference_design() {
        let cfg = StackConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, StackConfig::default());
        assert!((cfg.operating.temperature - 1173.0).abs() < 1e-12);
        assert!((cfg.operating.pressure - 2.0e6).abs() < 1e-6);
        assert!((cfg.sizing.power_per_cell - 2000.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let json = r#"{ "operating": { "temperature": 1073.0 }, "geometry": { "geometric_area": 40.0 } }"#;
        let cfg = StackConfig::from_json_str(json).unwrap();
        assert!((cfg.operating.temperature - 1073.0).abs() < 1e-12);
        assert!((cfg.operating.fuel_utilization - 0.75).abs() < 1e-12);
        assert!((cfg.geometry.geometric_area - 40.0).abs() < 1e-12);
        assert!((cfg.geometry.active_area_ratio - 500.0).abs() < 1e-12);
    }

    #[test]
    fn test_exchange_current_model_snake_case() {
        let json = r#"{ "electrochemistry": { "exchange_current_model": "arrhenius" } }"#;
        let cfg = StackConfig::from_json_str(json).unwrap();
        assert_eq!(
            cfg.electrochemistry.exchange_current_model,
            ExchangeCurrentModel::Arrhenius
        );
    }

    #[test]
    fn test_roundtrip_serialization() {
        let mut cfg = StackConfig::default();
        cfg.sizing.ideal_voltage = Some(1.25);
        cfg.conductivity.electrolyte.pre_exponential = 30_000.0;
        let json = cfg.to_json_pretty().unwrap();
        let cfg2 = StackConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg, cfg2);
    }

    #[test]
    fn test_roundtrip_is_bit_exact_for_floats() {
        let mut cfg = StackConfig::default();
        cfg.sizing.power_per_cell = 9709.832713258755;
        cfg.operating.temperature = 1173.000_000_000_000_2;
        let back = StackConfig::from_json_str(&cfg.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            back.sizing.power_per_cell.to_bits(),
            cfg.sizing.power_per_cell.to_bits()
        );
        assert_eq!(
            back.operating.temperature.to_bits(),
            cfg.operating.temperature.to_bits()
        );
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = StackConfig::from_json_str("{ \"operating\": 3 }").unwrap_err();
        assert!(matches!(err, SofcError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = StackConfig::from_file("/nonexistent/sofc_stack.json").unwrap_err();
        assert!(matches!(err, SofcError::Io(_)));
    }

    #[test]
    fn test_electrolyte_conductivity_at_reference_temperature() {
        // σ = 33400 · exp(−10300 / 1173)
        let sigma = ConductivityConfig::default().electrolyte.at(1173.0);
        let expected = 33_400.0 * (-10_300.0_f64 / 1173.0).exp();
        assert!((sigma - expected).abs() < 1e-12);
        assert!(sigma > 5.0 && sigma < 5.3, "σ_el = {sigma}");
    }

    #[test]
    fn test_conductivity_temperature_exponent() {
        let law = ArrheniusConductivity::new(95.0e6, 1150.0, 1);
        let expected = 95.0e6 / 1173.0 * (-1150.0_f64 / 1173.0).exp();
        assert!((law.at(1173.0) - expected).abs() / expected < 1e-14);
    }
}
