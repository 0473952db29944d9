//! Main simulation runner
//!
//! Steps the arm at a fixed rate, emits one [`SimulationRecord`] per step
//! and decides when the run ends:
//!
//! - Converged: both joints within [`CONVERGENCE_TOLERANCE`] of zero angle
//!   and zero velocity after a step (that step's record is still emitted)
//! - Exhausted: `max_steps` steps taken without converging
//! - Stopped: the caller's stop predicate fired between two steps
//!
//! A non-finite torque or state aborts the run with
//! [`SimError::Divergence`] before the offending record is emitted.

use thiserror::Error;

use super::{ConfigError, RecordSink, SimConfig, SimulationRecord};
use crate::control::{NoiseSource, PdPolicy, TorquePolicy};
use crate::dynamics::{ArmDynamics, JointState};
use crate::Vec2;

/// Angle [rad] and velocity [rad/s] tolerance around the zero target
pub const CONVERGENCE_TOLERANCE: f64 = 0.01;

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Simulation diverged at step {step}")]
    Divergence { step: usize },
    #[error("Record output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Both joints settled at the target
    Converged,
    /// Step budget used up
    Exhausted,
    /// External stop request
    Stopped,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub termination: Termination,
    /// Records emitted since the last reset
    pub steps: usize,
    /// Joint state at loop exit
    pub final_state: JointState,
}

/// Main simulator
///
/// The configuration is fixed once validated; build a new simulator to
/// change it.
pub struct Simulator<P> {
    /// Validated configuration
    config: SimConfig,
    /// Arm dynamics model
    dynamics: ArmDynamics,
    /// Torque policy
    policy: P,
    /// Current joint state
    state: JointState,
    /// Start angles of the previous step
    prev_theta: Vec2,
    /// Steps taken since reset
    step_index: usize,
}

impl<N: NoiseSource> Simulator<PdPolicy<N>> {
    /// Create a simulator driven by gravity + noisy PD control
    pub fn new(config: SimConfig, noise: N) -> Result<Self, ConfigError> {
        let policy = PdPolicy::new(config.gains.clone(), noise);
        Self::with_policy(config, policy)
    }
}

impl<P: TorquePolicy> Simulator<P> {
    /// Create a simulator with an arbitrary torque policy
    pub fn with_policy(config: SimConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let dynamics = ArmDynamics::new(config.physics.clone());
        let state = config.initial_state.to_state();

        Ok(Self {
            config,
            dynamics,
            policy,
            state,
            prev_theta: state.theta,
            step_index: 0,
        })
    }

    /// Restore the initial joint state
    ///
    /// The policy (and its noise generator) is left untouched.
    pub fn reset(&mut self) {
        self.state = self.config.initial_state.to_state();
        self.prev_theta = self.state.theta;
        self.step_index = 0;
    }

    /// Advance one step and return its record
    pub fn step(&mut self) -> Result<SimulationRecord, SimError> {
        let start = self.state;
        let torque = self.policy.torques(&self.dynamics, &self.prev_theta, &start);
        let end = self.dynamics.integrate(&start, &torque, self.config.dt);

        if !(torque.iter().all(|t| t.is_finite()) && end.is_finite()) {
            tracing::error!(
                step = self.step_index,
                tau1 = torque.x,
                tau2 = torque.y,
                "non-finite state, aborting run"
            );
            return Err(SimError::Divergence { step: self.step_index });
        }

        let record = SimulationRecord::new(&self.prev_theta, &start, &end, &torque);
        tracing::trace!(step = self.step_index, %record, "step");

        self.prev_theta = start.theta;
        self.state = end;
        self.step_index += 1;

        Ok(record)
    }

    /// Run until converged or out of steps
    pub fn run<S: RecordSink>(&mut self, sink: S) -> Result<RunSummary, SimError> {
        self.run_until(sink, || false)
    }

    /// Run until converged, out of steps, or `stop` returns true
    ///
    /// `stop` is polled once before every step.
    pub fn run_until<S, F>(&mut self, mut sink: S, mut stop: F) -> Result<RunSummary, SimError>
    where
        S: RecordSink,
        F: FnMut() -> bool,
    {
        tracing::info!(
            max_steps = self.config.max_steps,
            dt = self.config.dt,
            theta1 = self.state.theta.x,
            theta2 = self.state.theta.y,
            "starting simulation"
        );

        let termination = loop {
            if self.step_index >= self.config.max_steps {
                tracing::info!(steps = self.step_index, "step budget exhausted");
                break Termination::Exhausted;
            }
            if stop() {
                tracing::info!(steps = self.step_index, "stop requested");
                break Termination::Stopped;
            }

            let record = self.step()?;
            sink.emit(&record)?;

            if self.state.is_settled(CONVERGENCE_TOLERANCE) {
                tracing::info!(steps = self.step_index, "converged");
                break Termination::Converged;
            }
        };

        Ok(RunSummary {
            termination,
            steps: self.step_index,
            final_state: self.state,
        })
    }

    /// Get configuration
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get current joint state
    pub fn state(&self) -> &JointState {
        &self.state
    }

    /// Get number of steps taken since reset
    pub fn steps(&self) -> usize {
        self.step_index
    }

    /// Get arm dynamics
    pub fn dynamics(&self) -> &ArmDynamics {
        &self.dynamics
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}
