//! Gateway value model
//!
//! `JValue` is the dynamic value type that crosses the wire in both
//! directions. Remote objects stay on the gateway side; this end only holds
//! id handles, and every operation on one is another round trip.

use std::fmt;

use crate::common::{Error, Result};

/// A value sent to or received from the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum JValue {
    Null,
    /// Result of a `void` method. Never valid as an argument.
    Void,
    Bool(bool),
    /// Covers both of the wire's integer widths; the argument encoder
    /// picks the 32-bit or 64-bit tag by range.
    Int(i64),
    Double(f64),
    Str(String),
    Bytes(Vec<u8>),
    Object(RemoteObject),
}

impl JValue {
    /// Short type label for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            JValue::Null => "null",
            JValue::Void => "void",
            JValue::Bool(_) => "boolean",
            JValue::Int(_) => "integer",
            JValue::Double(_) => "double",
            JValue::Str(_) => "string",
            JValue::Bytes(_) => "bytes",
            JValue::Object(_) => "object reference",
        }
    }

    /// Extract an object reference, failing on anything else.
    ///
    /// Used after calls that hand back stateful objects (collections,
    /// counters, builders); a non-reference reply there is a fault on this
    /// side of the wire, not a remote one.
    pub fn into_object(self) -> Result<RemoteObject> {
        match self {
            JValue::Object(obj) => Ok(obj),
            other => Err(Error::unexpected("object reference", other.type_name())),
        }
    }
}

impl fmt::Display for JValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JValue::Null => write!(f, "null"),
            JValue::Void => write!(f, "void"),
            JValue::Bool(b) => write!(f, "{b}"),
            JValue::Int(v) => write!(f, "{v}"),
            JValue::Double(v) => write!(f, "{v}"),
            JValue::Str(s) => write!(f, "{s:?}"),
            JValue::Bytes(b) => write!(f, "{} bytes", b.len()),
            JValue::Object(obj) => write!(f, "{obj}"),
        }
    }
}

impl From<bool> for JValue {
    fn from(v: bool) -> Self {
        JValue::Bool(v)
    }
}

impl From<i32> for JValue {
    fn from(v: i32) -> Self {
        JValue::Int(v.into())
    }
}

impl From<i64> for JValue {
    fn from(v: i64) -> Self {
        JValue::Int(v)
    }
}

impl From<f64> for JValue {
    fn from(v: f64) -> Self {
        JValue::Double(v)
    }
}

impl From<&str> for JValue {
    fn from(v: &str) -> Self {
        JValue::Str(v.to_string())
    }
}

impl From<String> for JValue {
    fn from(v: String) -> Self {
        JValue::Str(v)
    }
}

impl From<&RemoteObject> for JValue {
    fn from(obj: &RemoteObject) -> Self {
        JValue::Object(obj.clone())
    }
}

/// Handle to an object registered on the gateway side.
///
/// Lists, maps, sets, arrays and iterators all collapse into this one
/// handle type; dispatch works the same for every kind, so per-kind
/// wrappers would add nothing the battery uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    id: String,
}

impl RemoteObject {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The gateway-side id, e.g. `o12`.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for RemoteObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JavaObject id={}", self.id)
    }
}

/// A class resolved through the JVM namespace, usable for static calls,
/// static field reads and construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaClass {
    fqn: String,
}

impl JavaClass {
    pub(crate) fn new(fqn: impl Into<String>) -> Self {
        Self { fqn: fqn.into() }
    }

    /// Fully qualified name, e.g. `java.lang.Math`.
    pub fn fqn(&self) -> &str {
        &self.fqn
    }
}

impl fmt::Display for JavaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn)
    }
}

/// What a dotted name resolved to in the JVM namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JvmEntity {
    Class(JavaClass),
    Package(String),
}
