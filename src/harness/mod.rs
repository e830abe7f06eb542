//! Probe battery, execution and reporting
//!
//! The harness owns the run's whole data flow: connect, execute the battery
//! in order, close the connection, then normalize and write the artifact.

pub mod battery;
pub mod outcome;
pub mod report;
pub mod runner;

pub use battery::{battery, Probe, ProbeGroup};
pub use outcome::{Outcome, ResultSet};

use std::net::SocketAddr;
use std::path::Path;

use crate::common::Result;
use crate::gateway::Gateway;

/// Execute one full comparison run against the gateway at `addr` and write
/// the artifact to `output`.
///
/// An unreachable gateway and a failed artifact write are the only fatal
/// errors; per-probe faults come back inside the result set.
pub async fn run_comparison(addr: SocketAddr, output: &Path) -> Result<ResultSet> {
    let mut gateway = Gateway::connect(addr).await?;

    let groups = battery::battery();
    let results = runner::run_battery(&mut gateway, &groups).await;

    // The connection is done before any artifact byte hits the disk. A
    // dirty close does not invalidate the collected outcomes.
    if let Err(error) = gateway.close().await {
        tracing::warn!("gateway connection did not close cleanly: {error}");
    }

    report::write_artifact(output, &results)?;
    Ok(results)
}
