//! Shared error and logging plumbing

pub mod error;
pub mod logging;

pub use error::{Error, Result};
