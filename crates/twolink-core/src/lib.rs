//! # Twolink Core
//!
//! Two-link planar arm (lumped-mass double pendulum) driven by a per-joint
//! PD controller, simulated with a fixed-step semi-implicit Euler scheme.
//!
//! ## Modules
//!
//! - [`math`]: Numerical integrators
//! - [`dynamics`]: Link parameters, joint state, gravity model, state update
//! - [`control`]: Torque policies (noisy PD, recorded-torque lookup) and noise sources
//! - [`kinematics`]: Joint angles to elbow/tip positions
//! - [`simulation`]: Configuration, simulation loop, output record stream

pub mod math;
pub mod dynamics;
pub mod control;
pub mod kinematics;
pub mod simulation;

use nalgebra::Vector2;

/// Per-joint pair, index 0 is joint 1 (base), index 1 is joint 2 (elbow)
pub type Vec2 = Vector2<f64>;

/// Gravity constant [m/s²]
pub const GRAVITY: f64 = 9.81;
