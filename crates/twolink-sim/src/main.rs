//! twolink-sim - run the reference arm under noisy PD control.
//!
//! Writes the record stream (header + one tab-separated line per step) to
//! stdout until the arm settles, the step budget runs out, or Ctrl-C.
//! Takes no arguments; the arm, gains and step budget are the built-in
//! defaults.
//!
//! Usage:
//!   twolink-sim > robot-control.txt
//!   RUST_LOG=twolink_core=trace twolink-sim

use anyhow::{Context, Result};

use twolink_core::control::UniformNoise;
use twolink_core::simulation::{SimConfig, Simulator};

fn main() -> Result<()> {
    twolink_sim::init_tracing()?;

    let config = SimConfig::default();
    let noise = UniformNoise::from_time(config.noise_amplitude);
    tracing::info!(seed = noise.seed(), amplitude = noise.amplitude(), "noise generator seeded");

    let sim = Simulator::new(config, noise).context("invalid simulation config")?;
    twolink_sim::run_to_stdout(sim)?;

    Ok(())
}
