//! Unit conversions applied at the interface boundary.
//!
//! Everything inside the model is SI: current density in A/m², pressure in
//! Pa, temperature in K. Callers that think in mA/cm², bar or °C convert here.

/// 1 mA/cm² expressed in A/m².
pub const MA_PER_CM2: f64 = 10.0;

/// 1 bar expressed in Pa.
pub const BAR: f64 = 1.0e5;

/// 0 °C expressed in K.
pub const ZERO_CELSIUS: f64 = 273.15;

/// mA/cm² → A/m².
pub fn ma_per_cm2_to_si(value: f64) -> f64 {
    value * MA_PER_CM2
}

/// A/m² → mA/cm².
pub fn si_to_ma_per_cm2(value: f64) -> f64 {
    value / MA_PER_CM2
}

/// bar → Pa.
pub fn bar_to_pa(value: f64) -> f64 {
    value * BAR
}

/// Pa → bar.
pub fn pa_to_bar(value: f64) -> f64 {
    value / BAR
}

/// °C → K.
pub fn celsius_to_kelvin(value: f64) -> f64 {
    value + ZERO_CELSIUS
}

/// K → °C.
pub fn kelvin_to_celsius(value: f64) -> f64 {
    value - ZERO_CELSIUS
}
