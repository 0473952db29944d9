//! twolink-replay - drive the arm from a recorded stream.
//!
//! Loads a record stream produced by twolink-sim and runs the arm with the
//! recorded torques, picking at each step the recorded step whose joint
//! angles are nearest to the current ones. Output uses the same stream
//! format on stdout.
//!
//! Usage:
//!   twolink-replay <dataset>
//!
//! Examples:
//!   twolink-sim > robot-control.txt
//!   twolink-replay robot-control.txt > replay.txt

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};

use twolink_core::control::{LookupPolicy, TorqueTable};
use twolink_core::simulation::{read_records, SimConfig, Simulator};

fn main() -> Result<()> {
    twolink_sim::init_tracing()?;

    let Some(path) = std::env::args().nth(1) else {
        anyhow::bail!("usage: twolink-replay <dataset>");
    };

    let file = File::open(&path).with_context(|| format!("cannot open dataset {}", path))?;
    let records = read_records(BufReader::new(file))
        .with_context(|| format!("cannot read dataset {}", path))?;
    tracing::info!(path = %path, records = records.len(), "dataset loaded");

    let policy = LookupPolicy::new(TorqueTable::new(records));
    let sim = Simulator::with_policy(SimConfig::default(), policy)
        .context("invalid simulation config")?;
    twolink_sim::run_to_stdout(sim)?;

    Ok(())
}
