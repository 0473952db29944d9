//! Shared plumbing for the twolink binaries
//!
//! Logging goes to stderr; stdout carries only the record stream.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use twolink_core::control::TorquePolicy;
use twolink_core::kinematics::forward_kinematics;
use twolink_core::simulation::{RecordWriter, RunSummary, Simulator};

/// Install the stderr log subscriber
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("twolink_core=info".parse()?)
                .add_directive("twolink_sim=info".parse()?)
                .add_directive("warn".parse()?),
        )
        .init();
    Ok(())
}

/// Flag raised by Ctrl-C
pub fn install_stop_flag() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    ctrlc::set_handler(move || {
        s.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;
    Ok(stop)
}

/// Run a simulator to completion, streaming records to stdout
///
/// Ctrl-C stops the run between steps.
pub fn run_to_stdout<P: TorquePolicy>(sim: Simulator<P>) -> Result<RunSummary> {
    let stop = install_stop_flag()?;
    let stdout = io::stdout();
    run_to_writer(sim, stdout.lock(), &stop)
}

/// Run a simulator to completion, streaming records to `out`
///
/// The header is written even when the run emits no records. `stop` is
/// polled before every step.
pub fn run_to_writer<P, W>(mut sim: Simulator<P>, out: W, stop: &AtomicBool) -> Result<RunSummary>
where
    P: TorquePolicy,
    W: Write,
{
    let mut writer = RecordWriter::new(out);
    writer.begin().context("failed to write stream header")?;

    let summary = sim
        .run_until(&mut writer, || stop.load(Ordering::SeqCst))
        .context("simulation aborted")?;

    let pose = forward_kinematics(&summary.final_state.theta, &sim.config().physics);
    tracing::info!(
        termination = ?summary.termination,
        steps = summary.steps,
        tip_x = pose.tip.x,
        tip_y = pose.tip.y,
        "run finished"
    );

    Ok(summary)
}
