//! Dynamics models for the two-link arm
//!
//! - Link parameters and joint state
//! - Lumped-mass gravity model
//! - Per-joint rod inertia and state update

pub mod arm;

pub use arm::*;
