//! Recorded-torque lookup policy
//!
//! Drives the arm from a previously recorded stream instead of a control
//! law: each step picks the recorded step whose six joint angles are
//! closest (Euclidean) to the current ones and applies its torques as the
//! total joint torque.

use super::TorquePolicy;
use crate::dynamics::{ArmDynamics, JointState};
use crate::simulation::SimulationRecord;
use crate::Vec2;

/// Recorded steps searchable by joint angles
#[derive(Debug, Clone, Default)]
pub struct TorqueTable {
    records: Vec<SimulationRecord>,
}

impl TorqueTable {
    pub fn new(records: Vec<SimulationRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record closest to `query` over
    /// `(prev_θ1, prev_θ2, start_θ1, start_θ2, end_θ1, end_θ2)`
    ///
    /// Ties keep the earliest record. Records at a NaN or infinite
    /// distance never match.
    pub fn nearest(&self, query: &[f64; 6]) -> Option<&SimulationRecord> {
        let mut best = None;
        let mut best_d2 = f64::INFINITY;

        for record in &self.records {
            let d2: f64 = record
                .angles()
                .iter()
                .zip(query.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();

            if d2 < best_d2 {
                best = Some(record);
                best_d2 = d2;
            }
        }

        best
    }
}

/// Torque policy backed by a [`TorqueTable`]
///
/// The end angles of the current step are not known before integration,
/// so the start angles stand in for them in the query. With an empty table
/// only gravity acts on the arm.
#[derive(Debug, Clone)]
pub struct LookupPolicy {
    table: TorqueTable,
}

impl LookupPolicy {
    pub fn new(table: TorqueTable) -> Self {
        if table.is_empty() {
            tracing::warn!("torque table is empty, arm will move under gravity alone");
        }
        Self { table }
    }

    pub fn table(&self) -> &TorqueTable {
        &self.table
    }
}

impl TorquePolicy for LookupPolicy {
    fn torques(&mut self, dynamics: &ArmDynamics, prev_theta: &Vec2, state: &JointState) -> Vec2 {
        let theta = &state.theta;
        let query = [prev_theta.x, prev_theta.y, theta.x, theta.y, theta.x, theta.y];

        match self.table.nearest(&query) {
            Some(record) => record.torque(),
            None => dynamics.gravity_torques(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::LinkParams;
    use approx::assert_relative_eq;

    fn record(theta: f64, tau: f64) -> SimulationRecord {
        SimulationRecord {
            prev_theta1: theta,
            prev_theta2: theta,
            start_theta1: theta,
            start_theta2: theta,
            end_theta1: theta,
            end_theta2: theta,
            tau1: tau,
            tau2: -tau,
        }
    }

    #[test]
    fn test_nearest_empty() {
        assert!(TorqueTable::default().nearest(&[0.0; 6]).is_none());
    }

    #[test]
    fn test_nearest_picks_closest() {
        let table = TorqueTable::new(vec![record(0.5, 1.0), record(0.1, 2.0), record(-0.3, 3.0)]);

        let best = table.nearest(&[0.12; 6]).unwrap();
        assert_eq!(best.tau1, 2.0);

        let best = table.nearest(&[-1.0; 6]).unwrap();
        assert_eq!(best.tau1, 3.0);
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let table = TorqueTable::new(vec![record(0.2, 1.0), record(-0.2, 2.0)]);

        let best = table.nearest(&[0.0; 6]).unwrap();
        assert_eq!(best.tau1, 1.0);
    }

    #[test]
    fn test_nearest_skips_nan_rows() {
        let table = TorqueTable::new(vec![record(f64::NAN, 1.0), record(0.0, 2.0)]);

        let best = table.nearest(&[0.0; 6]).unwrap();
        assert_eq!(best.tau1, 2.0);
    }

    #[test]
    fn test_nearest_without_finite_distance() {
        let table = TorqueTable::new(vec![record(f64::INFINITY, 1.0), record(f64::NAN, 2.0)]);

        assert!(table.nearest(&[0.0; 6]).is_none());
    }

    #[test]
    fn test_policy_falls_back_to_gravity_without_match() {
        let dynamics = ArmDynamics::new(LinkParams::default());
        let mut policy = LookupPolicy::new(TorqueTable::new(vec![record(f64::NAN, 5.0)]));
        let state = JointState::at_rest(0.3, -0.2);

        let tau = policy.torques(&dynamics, &state.theta, &state);

        assert_relative_eq!(tau, dynamics.gravity_torques(&state), epsilon = 1e-12);
    }

    #[test]
    fn test_policy_uses_recorded_torque() {
        let dynamics = ArmDynamics::new(LinkParams::default());
        let mut policy = LookupPolicy::new(TorqueTable::new(vec![record(0.5, -30.0), record(0.0, 0.0)]));
        let state = JointState::at_rest(0.45, 0.45);

        let tau = policy.torques(&dynamics, &state.theta, &state);

        assert_eq!(tau, Vec2::new(-30.0, 30.0));
    }

    #[test]
    fn test_policy_falls_back_to_gravity() {
        let dynamics = ArmDynamics::new(LinkParams::default());
        let mut policy = LookupPolicy::new(TorqueTable::default());
        let state = JointState::at_rest(0.3, -0.2);

        let tau = policy.torques(&dynamics, &state.theta, &state);

        assert_relative_eq!(tau, dynamics.gravity_torques(&state), epsilon = 1e-12);
    }
}
