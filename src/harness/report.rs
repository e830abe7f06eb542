//! Artifact normalization and writing
//!
//! The artifact exists to be diffed against the py4j and js4j runs, so its
//! shape is fixed: one top-level key per probe in execution order, each
//! mapping to `{"status", "value"}`, pretty-printed with two-space indent.
//! Normalization is lossy on purpose. Anything that is not null, boolean,
//! number or string flattens to its display form; the siblings do the same,
//! so the flattened forms still line up.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::common::{Error, Result};
use crate::gateway::JValue;

use super::outcome::{Outcome, ResultSet};

/// One probe's record in the artifact.
#[derive(Debug, Serialize)]
struct ProbeRecord {
    status: &'static str,
    value: Value,
}

/// Flatten a gateway value into the cross-client JSON value space.
pub fn normalize(value: &JValue) -> Value {
    match value {
        JValue::Null | JValue::Void => Value::Null,
        JValue::Bool(b) => Value::Bool(*b),
        JValue::Int(v) => Value::from(*v),
        JValue::Double(v) => Value::from(*v),
        JValue::Str(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

/// Render the artifact exactly as it is written to disk.
pub fn render(results: &ResultSet) -> Result<String> {
    let mut root = Map::with_capacity(results.len());
    for (name, outcome) in results.iter() {
        let value = match outcome {
            Outcome::Ok(value) => normalize(value),
            Outcome::JavaError(message) | Outcome::Error(message) => {
                Value::String(message.clone())
            }
        };
        let record = ProbeRecord {
            status: outcome.status(),
            value,
        };
        root.insert(name.to_string(), serde_json::to_value(record)?);
    }
    Ok(serde_json::to_string_pretty(&Value::Object(root))?)
}

/// Write the artifact, replacing any previous run's file.
pub fn write_artifact(path: &Path, results: &ResultSet) -> Result<()> {
    let text = render(results)?;
    std::fs::write(path, text).map_err(|source| Error::ReportWrite {
        path: path.display().to_string(),
        source,
    })
}

/// One-line run summary printed after the artifact is written.
pub fn summary_line(results: &ResultSet) -> String {
    format!(
        "{}/{} tests produced a result (errors are expected for exception tests)",
        results.ok_count(),
        results.len()
    )
}
