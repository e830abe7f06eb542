//! Client binding for the Java gateway wire protocol
//!
//! Implements the client side of the Py4J 0.10 line protocol: framing in
//! [`codec`], the value grammar in [`protocol`], the dynamic value model in
//! [`types`] and the connection itself in [`client`]. Callback channels
//! (gateway-initiated calls back into this process) are not implemented;
//! nothing in the comparison battery needs them.

pub mod client;
pub mod codec;
pub mod protocol;
pub mod types;

pub use client::Gateway;
pub use types::{JValue, JavaClass, JvmEntity, RemoteObject};
