//! Error types for the comparison harness
//!
//! Most faults raised here never abort a run: the runner catches them per
//! probe and records their string form in the artifact. Only connection
//! setup and artifact writing are allowed to kill the process.

use std::io;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the comparison harness
#[derive(Error, Debug)]
pub enum Error {
    // === Connection errors ===
    #[error("cannot reach the Java gateway at {addr}: {source}. Is the gateway running?")]
    GatewayUnreachable {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("gateway connection closed unexpectedly")]
    ConnectionClosed,

    // === Protocol errors ===
    /// The gateway answered, but with something the protocol does not
    /// allow at this point, or with an error of its own that carries no
    /// remote exception object.
    #[error("gateway protocol error: {0}")]
    Protocol(String),

    /// An exception thrown inside the remote JVM. The payload is the
    /// exception's own string form, fetched through a follow-up toString
    /// call on the exception object.
    #[error("{0}")]
    JavaException(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedValue { expected: &'static str, got: String },

    #[error("{0} names a package, not a class")]
    NotAClass(String),

    #[error("{class}.{member} is a method, not a static field")]
    NotAField { class: String, member: String },

    // === IO errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write results to '{path}': {source}")]
    ReportWrite {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }

    /// Create a type-mismatch error
    pub fn unexpected(expected: &'static str, got: impl Into<String>) -> Self {
        Error::UnexpectedValue {
            expected,
            got: got.into(),
        }
    }

    /// True for faults raised inside the remote JVM, as opposed to
    /// connection, protocol or usage faults on this side.
    pub fn is_java_exception(&self) -> bool {
        matches!(self, Error::JavaException(_))
    }
}
