//! SOFC stack performance model.
//!
//! Voltage model, power matching, discharge evaluation and sizing

pub mod discharge;
pub mod polarization;
pub mod sizing;
pub mod solver;
pub mod voltage;
