//! PD joint controller
//!
//! τcᵢ = (-Kpᵢ · θᵢ - Kdᵢ · ωᵢ) · ηᵢ
//!
//! where ηᵢ is a multiplicative noise factor drawn fresh for each joint on
//! every step. The setpoint is fixed at θ = 0, ω = 0 for both joints.

use serde::{Deserialize, Serialize};

use super::{NoiseSource, TorquePolicy};
use crate::dynamics::{ArmDynamics, JointState};
use crate::Vec2;

/// PD gains per joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdGains {
    /// Proportional gain [N·m/rad]
    pub kp: Vec2,
    /// Derivative gain [N·m·s/rad]
    pub kd: Vec2,
}

impl Default for PdGains {
    fn default() -> Self {
        Self {
            kp: Vec2::new(50.0, 50.0),
            kd: Vec2::new(20.0, 20.0),
        }
    }
}

/// Corrective PD torque for each joint, scaled by actuator noise
///
/// Draws exactly two noise factors, joint 1 first.
pub fn control_torques<N: NoiseSource + ?Sized>(
    state: &JointState,
    gains: &PdGains,
    noise: &mut N,
) -> Vec2 {
    let base = -gains.kp.component_mul(&state.theta) - gains.kd.component_mul(&state.omega);
    let eta1 = noise.noise_factor();
    let eta2 = noise.noise_factor();
    base.component_mul(&Vec2::new(eta1, eta2))
}

/// Gravity plus noisy PD feedback
///
/// This is the default policy of the simulation loop.
#[derive(Debug, Clone)]
pub struct PdPolicy<N> {
    /// Controller gains
    pub gains: PdGains,
    noise: N,
}

impl<N: NoiseSource> PdPolicy<N> {
    pub fn new(gains: PdGains, noise: N) -> Self {
        Self { gains, noise }
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }
}

impl<N: NoiseSource> TorquePolicy for PdPolicy<N> {
    fn torques(&mut self, dynamics: &ArmDynamics, _prev_theta: &Vec2, state: &JointState) -> Vec2 {
        dynamics.gravity_torques(state) + control_torques(state, &self.gains, &mut self.noise)
    }
}
