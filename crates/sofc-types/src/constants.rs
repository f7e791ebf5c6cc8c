// ─────────────────────────────────────────────────────────────────────
// SOFC Stack Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Faraday constant (C/mol)
pub const FARADAY: f64 = 96_485.3329;

/// Universal gas constant (J/(mol K))
pub const GAS_CONSTANT: f64 = 8.314_462_618_153_24;

/// Lower heating value of hydrogen (J/kg)
pub const LHV_H2: f64 = 120.0e6;

/// Molar mass of H2 (kg/mol)
pub const M_H2: f64 = 0.002_015_68;

/// Molar mass of O2 (kg/mol)
pub const M_O2: f64 = 0.032;

/// Molar mass of H2O (kg/mol)
pub const M_H2O: f64 = 0.018_015_28;

/// Molar mass of N2 (kg/mol)
pub const M_N2: f64 = 0.028_013_4;

/// Entropy change of H2 + 1/2 O2 -> H2O (J/(mol K))
pub const ENTROPY_CHANGE: f64 = -49.6;

/// Mass fraction of O2 in air, used to convert oxidant demand to air flow.
pub const O2_MASS_FRACTION_AIR: f64 = 0.23;

/// Nernst reference pressure (Pa)
pub const P_REFERENCE: f64 = 1.0e5;
