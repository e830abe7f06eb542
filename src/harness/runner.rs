//! Sequential battery execution
//!
//! One probe in flight at a time, no retries, no per-probe timeouts: the
//! run is strictly ordered so that object ids and artifact keys come out
//! the same way every time. Probe failures are data, never fatal.

use colored::Colorize;

use crate::common::{Error, Result};
use crate::gateway::{Gateway, JValue};

use super::battery::ProbeGroup;
use super::outcome::{Outcome, ResultSet};

/// Run every group in order and collect exactly one outcome per probe.
pub async fn run_battery(gateway: &mut Gateway, groups: &[ProbeGroup]) -> ResultSet {
    let mut results = ResultSet::new();

    for group in groups {
        println!("\n--- {} ---", group.label);
        for probe in &group.probes {
            let outcome = classify(probe.run(gateway).await);
            print_outcome(probe.name, &outcome);
            results.record(probe.name, outcome);
        }
    }

    results
}

/// Reduce a probe result to its outcome class.
///
/// Remote JVM exceptions are their own class; everything else that can go
/// wrong (IO, protocol, unexpected types) counts as a local error.
pub fn classify(result: Result<JValue>) -> Outcome {
    match result {
        Ok(value) => Outcome::Ok(value),
        Err(Error::JavaException(exception)) => Outcome::JavaError(exception),
        Err(other) => Outcome::Error(other.to_string()),
    }
}

fn print_outcome(name: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Ok(value) => {
            println!("  {}  {} => {}", "PASS".green(), name, value);
        }
        Outcome::JavaError(message) => {
            println!("  {}  {}: {}", "JAVA_ERR".yellow(), name, message);
        }
        Outcome::Error(message) => {
            println!("  {}  {}: {}", "ERROR".red(), name, message);
        }
    }
}
