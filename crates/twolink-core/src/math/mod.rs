//! Mathematical utilities for the arm simulator
//!
//! Fixed-step integrators for second-order systems.

pub mod integrator;

pub use integrator::*;
