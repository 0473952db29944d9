//! Actuator noise sources
//!
//! The PD controller scales each joint's torque by a factor drawn from a
//! [`NoiseSource`]. Two draws per step: joint 1 first, then joint 2.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default half-width of the noise band (±10%)
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 0.10;

/// Draws multiplicative noise factors centered at 1.0
pub trait NoiseSource {
    /// Next noise factor
    fn noise_factor(&mut self) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn noise_factor(&mut self) -> f64 {
        (**self).noise_factor()
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn noise_factor(&mut self) -> f64 {
        (**self).noise_factor()
    }
}

/// Uniform noise on `[1 - amplitude, 1 + amplitude]`
///
/// Seeded once at construction; there is no reseed.
#[derive(Debug, Clone)]
pub struct UniformNoise {
    rng: StdRng,
    amplitude: f64,
    seed: u64,
}

impl UniformNoise {
    pub fn new(seed: u64, amplitude: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            amplitude,
            seed,
        }
    }

    /// Seed from the wall clock
    pub fn from_time(amplitude: f64) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::new(seed, amplitude)
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

impl NoiseSource for UniformNoise {
    fn noise_factor(&mut self) -> f64 {
        self.rng
            .random_range(1.0 - self.amplitude..=1.0 + self.amplitude)
    }
}

/// Constant noise factor
///
/// `FixedNoise::default()` is 1.0, which disables noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise(pub f64);

impl Default for FixedNoise {
    fn default() -> Self {
        Self(1.0)
    }
}

impl NoiseSource for FixedNoise {
    fn noise_factor(&mut self) -> f64 {
        self.0
    }
}
