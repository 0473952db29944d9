//! Two-link arm dynamics
//!
//! Lumped-mass model of a planar two-rod arm:
//!
//! τg₁ = -(m₁ + m₂) · g · L₁ · sin θ₁
//! τg₂ = -m₂ · g · L₂ · sin θ₂
//! αᵢ  = τᵢ / (mᵢ Lᵢ²)
//!
//! where:
//! - θᵢ: joint angle from vertical [rad] (θ₂ relative to link 1)
//! - mᵢ, Lᵢ: rod mass and length
//! - τᵢ: total joint torque (gravity + control)
//!
//! Joint 1 carries the weight of both rods. There is no Coriolis,
//! centrifugal or inertial cross-coupling term; controller gains are tuned
//! against exactly this model.

use serde::{Deserialize, Serialize};

use crate::math::semi_implicit_euler;
use crate::{Vec2, GRAVITY};

/// Joint state of the arm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    /// Joint angles [rad]
    pub theta: Vec2,
    /// Joint angular velocities [rad/s]
    pub omega: Vec2,
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            theta: Vec2::zeros(),
            omega: Vec2::zeros(),
        }
    }
}

impl JointState {
    pub fn new(theta: Vec2, omega: Vec2) -> Self {
        Self { theta, omega }
    }

    /// Both joints at the given angles with zero velocity
    pub fn at_rest(theta1: f64, theta2: f64) -> Self {
        Self {
            theta: Vec2::new(theta1, theta2),
            omega: Vec2::zeros(),
        }
    }

    /// True when every angle and velocity component is finite
    pub fn is_finite(&self) -> bool {
        self.theta.iter().chain(self.omega.iter()).all(|v| v.is_finite())
    }

    /// True when both joints are within `tolerance` of the zero target in
    /// angle and in velocity (strict inequality)
    pub fn is_settled(&self, tolerance: f64) -> bool {
        self.theta.iter().chain(self.omega.iter()).all(|v| v.abs() < tolerance)
    }
}

/// Physical parameters of the two rods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkParams {
    /// Rod masses [kg]
    pub mass: Vec2,
    /// Rod lengths [m]
    pub length: Vec2,
    /// Gravitational acceleration [m/s²]
    pub gravity: f64,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            mass: Vec2::new(1.0, 1.5),
            length: Vec2::new(1.0, 1.5),
            gravity: GRAVITY,
        }
    }
}

impl LinkParams {
    pub fn new(mass: Vec2, length: Vec2, gravity: f64) -> Self {
        Self { mass, length, gravity }
    }

    /// Rod moment of inertia about its own pivot, I = m L² [kg·m²]
    pub fn inertia(&self) -> Vec2 {
        self.mass.component_mul(&self.length.component_mul(&self.length))
    }
}

/// Gravitational torque on each joint [N·m]
///
/// Negative for positive angles, pulling both rods back toward vertical.
pub fn gravitational_torques(theta: &Vec2, params: &LinkParams) -> Vec2 {
    let (m1, m2) = (params.mass.x, params.mass.y);
    let (l1, l2) = (params.length.x, params.length.y);
    let g = params.gravity;

    Vec2::new(
        -(m1 + m2) * g * l1 * theta.x.sin(),
        -m2 * g * l2 * theta.y.sin(),
    )
}

/// Arm dynamics model
#[derive(Debug, Clone)]
pub struct ArmDynamics {
    pub params: LinkParams,
    inertia: Vec2,
}

impl ArmDynamics {
    pub fn new(params: LinkParams) -> Self {
        let inertia = params.inertia();
        Self { params, inertia }
    }

    /// Gravitational torques at the given state
    pub fn gravity_torques(&self, state: &JointState) -> Vec2 {
        gravitational_torques(&state.theta, &self.params)
    }

    /// Angular acceleration from total joint torque, αᵢ = τᵢ / Iᵢ
    pub fn angular_acceleration(&self, torque: &Vec2) -> Vec2 {
        torque.component_div(&self.inertia)
    }

    /// Advance the state by one step under a constant torque
    ///
    /// Velocity is updated first and the angle update uses the new
    /// velocity. Angles are not wrapped.
    pub fn integrate(&self, state: &JointState, torque: &Vec2, dt: f64) -> JointState {
        let alpha = self.angular_acceleration(torque);
        let (theta, omega) = semi_implicit_euler(&state.theta, &state.omega, &alpha, dt);
        JointState { theta, omega }
    }
}
