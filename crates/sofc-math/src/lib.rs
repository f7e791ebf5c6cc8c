//! Numerical primitives for SOFC Stack Core.

pub mod minimize;
