//! Numerical integration methods
//!
//! The arm is advanced with semi-implicit (symplectic) Euler: the velocity
//! update happens first and the position update reads the new velocity.

use nalgebra::SVector;

/// Semi-implicit Euler for second-order systems
///
/// Updates velocity first, then uses the new velocity to update position.
/// More stable than explicit Euler for oscillatory systems.
///
/// # Arguments
/// * `pos` - Current position
/// * `vel` - Current velocity
/// * `acc` - Acceleration (derivative of velocity)
/// * `dt` - Time step
///
/// # Returns
/// (new_position, new_velocity)
pub fn semi_implicit_euler<const N: usize>(
    pos: &SVector<f64, N>,
    vel: &SVector<f64, N>,
    acc: &SVector<f64, N>,
    dt: f64,
) -> (SVector<f64, N>, SVector<f64, N>) {
    let new_vel = vel + acc * dt;
    let new_pos = pos + new_vel * dt;
    (new_pos, new_vel)
}
