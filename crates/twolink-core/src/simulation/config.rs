//! Simulation configuration
//!
//! Defines configuration structures for setting up simulations. The
//! defaults are the reference arm: 1.0 m / 1.0 kg upper rod, 1.5 m / 1.5 kg
//! lower rod, Kp = 50, Kd = 20, 10 ms step, both joints starting at 30°.

use std::f64::consts::FRAC_PI_6;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::{PdGains, DEFAULT_NOISE_AMPLITUDE};
use crate::dynamics::{JointState, LinkParams};

/// Invalid configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Mass of link {joint} must be positive, got {value}")]
    NonPositiveMass { joint: usize, value: f64 },
    #[error("Length of link {joint} must be positive, got {value}")]
    NonPositiveLength { joint: usize, value: f64 },
    #[error("Time step must be positive, got {0}")]
    NonPositiveTimestep(f64),
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    #[error("Noise amplitude must lie in [0, 1), got {0}")]
    InvalidNoiseAmplitude(f64),
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Simulation time step [s]
    pub dt: f64,
    /// Step budget before the run ends as exhausted
    pub max_steps: usize,
    /// Physical parameters
    pub physics: LinkParams,
    /// PD gains
    pub gains: PdGains,
    /// Initial joint angles
    pub initial_state: InitialStateConfig,
    /// Half-width of the multiplicative actuator noise band
    pub noise_amplitude: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            max_steps: 1000, // 10 s at 100 Hz
            physics: LinkParams::default(),
            gains: PdGains::default(),
            initial_state: InitialStateConfig::default(),
            noise_amplitude: DEFAULT_NOISE_AMPLITUDE,
        }
    }
}

impl SimConfig {
    /// Check the physical invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() {
            return Err(ConfigError::NonFinite("dt"));
        }
        if self.dt <= 0.0 {
            return Err(ConfigError::NonPositiveTimestep(self.dt));
        }

        for (i, (&m, &l)) in self
            .physics
            .mass
            .iter()
            .zip(self.physics.length.iter())
            .enumerate()
        {
            if !m.is_finite() {
                return Err(ConfigError::NonFinite("mass"));
            }
            if !l.is_finite() {
                return Err(ConfigError::NonFinite("length"));
            }
            if m <= 0.0 {
                return Err(ConfigError::NonPositiveMass { joint: i + 1, value: m });
            }
            if l <= 0.0 {
                return Err(ConfigError::NonPositiveLength { joint: i + 1, value: l });
            }
        }

        if !self.physics.gravity.is_finite() {
            return Err(ConfigError::NonFinite("gravity"));
        }
        if !self.gains.kp.iter().chain(self.gains.kd.iter()).all(|g| g.is_finite()) {
            return Err(ConfigError::NonFinite("gains"));
        }
        if !self.initial_state.to_state().is_finite() {
            return Err(ConfigError::NonFinite("initial state"));
        }
        if !(0.0..1.0).contains(&self.noise_amplitude) {
            return Err(ConfigError::InvalidNoiseAmplitude(self.noise_amplitude));
        }

        Ok(())
    }
}

/// Initial state configuration
///
/// The arm always starts at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialStateConfig {
    /// Initial angle of joint 1 [rad]
    pub theta1: f64,
    /// Initial angle of joint 2 [rad]
    pub theta2: f64,
}

impl Default for InitialStateConfig {
    fn default() -> Self {
        Self {
            theta1: FRAC_PI_6,
            theta2: FRAC_PI_6,
        }
    }
}

impl InitialStateConfig {
    pub fn to_state(&self) -> JointState {
        JointState::at_rest(self.theta1, self.theta2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();

        assert_eq!(config.dt, 0.01);
        assert_eq!(config.max_steps, 1000);
        assert_eq!(config.physics.gravity, 9.81);
        assert_eq!(config.physics.length, Vec2::new(1.0, 1.5));
        assert_eq!(config.physics.mass, Vec2::new(1.0, 1.5));
        assert_eq!(config.gains.kp, Vec2::new(50.0, 50.0));
        assert_eq!(config.gains.kd, Vec2::new(20.0, 20.0));
        assert_eq!(config.initial_state.theta1, FRAC_PI_6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_initial_state_at_rest() {
        let state = InitialStateConfig { theta1: 0.2, theta2: -0.1 }.to_state();

        assert_eq!(state.theta, Vec2::new(0.2, -0.1));
        assert_eq!(state.omega, Vec2::zeros());
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let mut config = SimConfig::default();
        config.physics.mass.y = 0.0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveMass { joint: 2, value: 0.0 })
        );
    }

    #[test]
    fn test_rejects_non_positive_length() {
        let mut config = SimConfig::default();
        config.physics.length.x = -1.0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveLength { joint: 1, value: -1.0 })
        );
    }

    #[test]
    fn test_rejects_bad_timestep() {
        let mut config = SimConfig::default();
        config.dt = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveTimestep(0.0)));

        config.dt = f64::NAN;
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("dt")));
    }

    #[test]
    fn test_rejects_non_finite_mass() {
        let mut config = SimConfig::default();
        config.physics.mass.x = f64::NAN;
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("mass")));

        config.physics.mass.x = f64::INFINITY;
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("mass")));
    }

    #[test]
    fn test_rejects_non_finite_length() {
        let mut config = SimConfig::default();
        config.physics.length.y = f64::INFINITY;

        assert_eq!(config.validate(), Err(ConfigError::NonFinite("length")));
    }

    #[test]
    fn test_rejects_noise_amplitude() {
        let mut config = SimConfig::default();
        config.noise_amplitude = 1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidNoiseAmplitude(1.0)));

        config.noise_amplitude = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_step_budget_is_valid() {
        let mut config = SimConfig::default();
        config.max_steps = 0;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serializes() {
        let config = SimConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.max_steps, config.max_steps);
        assert_eq!(back.gains, config.gains);
    }
}
