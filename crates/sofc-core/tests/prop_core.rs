// ─────────────────────────────────────────────────────────────────────
// SOFC Stack Core — Property-Based Tests (proptest) for sofc-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for sofc-core using proptest.
//!
//! Covers: voltage monotonicity, power-match inversion on the rising branch,
//! sizing/discharge agreement, area scaling, OCV operating band.

use proptest::prelude::*;
use sofc_core::discharge::discharge;
use sofc_core::sizing::size;
use sofc_core::solver::{cell_power, solve_current_density, SolverSettings};
use sofc_core::voltage::{self, open_circuit_voltage, ActivationSettings};
use sofc_types::config::StackConfig;
use sofc_types::params::StackParameters;

fn reference() -> StackParameters {
    StackParameters::new(StackConfig::default()).unwrap()
}

// ── Voltage Model ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Terminal voltage strictly decreases with current density.
    #[test]
    fn voltage_decreases_with_current(
        i in 0.0f64..11_000.0,
        step in 10.0f64..1000.0,
    ) {
        let p = reference();
        let v1 = voltage::voltage(&p, i).unwrap();
        let v2 = voltage::voltage(&p, i + step).unwrap();
        prop_assert!(v2 < v1, "V({}) = {} >= V({}) = {}", i + step, v2, i, v1);
    }

    /// OCV stays in the expected band across the operating envelope.
    #[test]
    fn ocv_in_operating_band(
        t in 1073.0f64..1273.0,
        pressure in 1.0e5f64..3.0e6,
    ) {
        let p = reference().with_operating_conditions(t, pressure).unwrap();
        let ocv = open_circuit_voltage(&p);
        prop_assert!(ocv > 0.8 && ocv < 1.2, "OCV = {} at T = {}, P = {}", ocv, t, pressure);
    }

    /// V(0) differs from OCV only by the activation bracket floor.
    #[test]
    fn zero_current_voltage_near_ocv(t in 1073.0f64..1273.0) {
        let p = reference().with_operating_conditions(t, 2.0e6).unwrap();
        let b = voltage::evaluate(&p, 0.0, &ActivationSettings::default()).unwrap();
        prop_assert!((b.terminal - b.ocv).abs() < 1e-4);
    }
}

// ── Power Matching ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Solving for the power delivered at i recovers i on the rising branch.
    #[test]
    fn power_match_inverts_forward_model(i in 5.0f64..5000.0) {
        let p = reference();
        let s = SolverSettings::default();
        let target = cell_power(&p, i, &s.activation).unwrap();
        let m = solve_current_density(&p, target, &s).unwrap();
        prop_assert!((m.current_density - i).abs() / i < 1e-4,
            "i = {}, recovered {}", i, m.current_density);
        prop_assert!(m.residual <= 1e-6 * target);
    }

    /// Discharge and sizing report the same stack for any feasible request.
    #[test]
    fn discharge_and_sizing_agree(power in 2.0e4f64..2.0e7) {
        let p = reference();
        let op = discharge(&p, power, &SolverSettings::default()).unwrap();
        let s = size(&p, power).unwrap();
        prop_assert_eq!(op.number_of_cells, s.number_of_cells);
        prop_assert!(op.voltage > 0.0);
        prop_assert!(op.efficiency > 0.0 && op.efficiency < 1.0);
        prop_assert!(op.heat_out > 0.0);
    }

    /// Doubling the geometric area doubles active area and, at fixed
    /// current density, cell power.
    #[test]
    fn doubling_area_doubles_power(i in 10.0f64..6000.0) {
        let base = StackConfig::default();
        let mut doubled = base.clone();
        doubled.geometry.geometric_area *= 2.0;
        let p1 = StackParameters::new(base).unwrap();
        let p2 = StackParameters::new(doubled).unwrap();
        prop_assert!((p2.active_area() - 2.0 * p1.active_area()).abs() < 1e-9);

        let a = ActivationSettings::default();
        let w1 = cell_power(&p1, i, &a).unwrap();
        let w2 = cell_power(&p2, i, &a).unwrap();
        prop_assert!((w2 / w1 - 2.0).abs() < 2e-4, "ratio = {}", w2 / w1);
    }
}
