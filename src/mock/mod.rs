//! In-process mock gateway
//!
//! A TCP server with the observable semantics of the Java test entry point,
//! so the full battery runs without a JVM. Integration tests use it
//! in-process through [`MockGateway`]; process-level tests run it through
//! the `mock-gateway` binary.

mod entry;
mod server;

pub use server::MockGateway;
