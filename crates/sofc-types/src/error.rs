use thiserror::Error;

pub use crate::params::Electrode;

#[derive(Error, Debug)]
pub enum SofcError {
    #[error(
        "Infeasible power request: {requested} W outside attainable range [{min_power}, {max_power}] W"
    )]
    InfeasiblePowerRequest {
        requested: f64,
        min_power: f64,
        max_power: f64,
    },

    #[error("Non-physical terminal voltage {voltage} V at current density {current_density} A/m^2")]
    NonPhysicalVoltage { current_density: f64, voltage: f64 },

    #[error("Invalid stack parameters: {0}")]
    InvalidParameters(String),

    #[error(
        "Activation overpotential solve for {electrode} did not converge in {iterations} iterations (best estimate {estimate} V)"
    )]
    ActivationSolveNonConvergence {
        electrode: Electrode,
        estimate: f64,
        iterations: usize,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SofcResult<T> = Result<T, SofcError>;
