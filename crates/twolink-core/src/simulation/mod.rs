//! Simulation framework for the two-link arm
//!
//! Configuration, the fixed-step simulation loop, and the record stream
//! that is the simulator's only output.

pub mod simulator;
pub mod config;
pub mod record;

pub use simulator::*;
pub use config::*;
pub use record::*;
