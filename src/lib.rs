//! Comparison harness for a Py4J-style Java gateway
//!
//! Connects to a running gateway, executes a fixed battery of probes
//! against its entry point and JVM namespace, classifies every outcome and
//! writes a JSON artifact shaped for diffing against runs made through the
//! sibling py4j and js4j clients.

pub mod common;
pub mod gateway;
pub mod harness;
pub mod mock;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use gateway::{Gateway, JValue};
pub use harness::{Outcome, ResultSet};
