//! Probe outcomes and the run's result set

use crate::gateway::JValue;

/// Classified result of one probe.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every remote call in the probe succeeded; holds the final value.
    Ok(JValue),
    /// A fault raised inside the remote JVM and carried back through the
    /// gateway; holds the remote exception's string form.
    JavaError(String),
    /// Any other failure (connection, protocol, type mismatch); holds the
    /// error's string form.
    Error(String),
}

impl Outcome {
    /// Status tag as written to the artifact.
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Ok(_) => "ok",
            Outcome::JavaError(_) => "java_error",
            Outcome::Error(_) => "error",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }
}

/// All outcomes of one run, in execution order.
///
/// Append-only: every probe records exactly once and nothing is ever
/// overwritten, so iteration order is the battery's order and the artifact
/// keys fall out in the same order.
#[derive(Debug, Default)]
pub struct ResultSet {
    entries: Vec<(String, Outcome)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a probe's outcome. A duplicate name is a battery bug.
    pub fn record(&mut self, name: &str, outcome: Outcome) {
        debug_assert!(
            self.entries.iter().all(|(existing, _)| existing != name),
            "probe {name:?} recorded twice"
        );
        self.entries.push((name.to_string(), outcome));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many probes came back `ok`.
    pub fn ok_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_ok()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(name, o)| (name.as_str(), o))
    }

    /// Look up one probe's outcome by name.
    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o)
    }
}
