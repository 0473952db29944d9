//! Forward kinematics of the two-link arm
//!
//! Pivot at the origin, y up, angles measured from vertical. The second
//! joint angle is relative to the first link.

use serde::{Deserialize, Serialize};

use crate::dynamics::LinkParams;
use crate::Vec2;

/// Planar positions of the arm's joints [m]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmPose {
    /// End of link 1 / joint 2
    pub elbow: Vec2,
    /// End of link 2
    pub tip: Vec2,
}

/// Elbow and tip positions for the given joint angles
pub fn forward_kinematics(theta: &Vec2, params: &LinkParams) -> ArmPose {
    let (l1, l2) = (params.length.x, params.length.y);
    let absolute2 = theta.x + theta.y;

    let elbow = Vec2::new(l1 * theta.x.sin(), l1 * theta.x.cos());
    let tip = elbow + Vec2::new(l2 * absolute2.sin(), l2 * absolute2.cos());

    ArmPose { elbow, tip }
}
