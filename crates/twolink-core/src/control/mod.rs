//! Control algorithms for the two-link arm
//!
//! - PD joint controller with multiplicative actuator noise
//! - Noise sources (seeded uniform, fixed)
//! - Recorded-torque lookup policy
//!
//! A [`TorquePolicy`] produces the TOTAL torque applied to each joint for
//! the coming step; the simulation loop is generic over it.

pub mod noise;
pub mod pd;
pub mod lookup;

pub use noise::*;
pub use pd::*;
pub use lookup::*;

use crate::dynamics::{ArmDynamics, JointState};
use crate::Vec2;

/// Source of the total joint torque for one simulation step
pub trait TorquePolicy {
    /// Compute the total torque [N·m] for each joint
    ///
    /// # Arguments
    /// * `dynamics` - Arm model (gravity, inertia)
    /// * `prev_theta` - Joint angles at the start of the previous step
    /// * `state` - Joint state at the start of this step
    fn torques(&mut self, dynamics: &ArmDynamics, prev_theta: &Vec2, state: &JointState) -> Vec2;
}
