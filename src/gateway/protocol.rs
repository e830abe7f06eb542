//! Wire grammar: commands, type tags, string escaping and reply decoding
//!
//! The gateway speaks a line-oriented text protocol. A request is a command
//! character on its own line, followed by one part per line, terminated by
//! an `e` line. Every request gets exactly one reply line starting with `!`,
//! carrying a status character (`y` success, `x` error), a type tag and the
//! payload. Values are tagged with one character: `n` null, `b` boolean,
//! `i`/`L` 32/64-bit integers, `d` double, `s` escaped string, `j` base64
//! bytes, and a family of reference tags (`r`, `l`, `a`, `h`, `t`, `g`) that
//! all carry a server-side object id.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::common::{Error, Result};

use super::types::{JValue, RemoteObject};

// Commands.
pub const CALL_COMMAND: &str = "c";
pub const CONSTRUCTOR_COMMAND: &str = "i";
pub const REFLECTION_COMMAND: &str = "r";
pub const MEMORY_COMMAND: &str = "m";

// Subcommands.
pub const REFL_GET_UNKNOWN: &str = "u";
pub const REFL_GET_MEMBER: &str = "m";
pub const MEMORY_DELETE: &str = "d";

/// The entry point's fixed object id.
pub const ENTRY_POINT_OBJECT_ID: &str = "t";
/// Target prefix selecting static dispatch on a class.
pub const STATIC_PREFIX: &str = "z:";
/// Id of the default JVM view, the root for namespace resolution.
pub const DEFAULT_JVM_VIEW_ID: &str = "rj";
/// Terminates every request.
pub const END: &str = "e";
/// First character of every reply line.
pub const RETURN_MESSAGE: char = '!';

const SUCCESS: char = 'y';
const FAILURE: char = 'x';

const NULL_TYPE: char = 'n';
const VOID_TYPE: char = 'v';
const BOOLEAN_TYPE: char = 'b';
const INTEGER_TYPE: char = 'i';
const LONG_TYPE: char = 'L';
const DOUBLE_TYPE: char = 'd';
const STRING_TYPE: char = 's';
const BYTES_TYPE: char = 'j';
const REFERENCE_TYPE: char = 'r';
const LIST_TYPE: char = 'l';
const MAP_TYPE: char = 'a';
const SET_TYPE: char = 'h';
const ARRAY_TYPE: char = 't';
const ITERATOR_TYPE: char = 'g';
const CLASS_TYPE: char = 'c';
const PACKAGE_TYPE: char = 'p';
const METHOD_TYPE: char = 'm';

/// Escape a string for transport. Escaped strings never contain a real
/// newline, which is what keeps the one-line-per-part framing sound.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape`]. Unknown escape pairs pass through verbatim.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Render one argument part (type tag plus payload, no newline).
///
/// The gateway resolves overloads by wire type, so integers within the
/// 32-bit range must go as `i` and only the rest as `L`; a method declared
/// `add(int, int)` is not found for `L` arguments.
pub fn encode_argument(value: &JValue) -> Result<String> {
    Ok(match value {
        JValue::Null => NULL_TYPE.to_string(),
        JValue::Void => return Err(Error::protocol("void cannot be passed as an argument")),
        JValue::Bool(b) => format!("{BOOLEAN_TYPE}{b}"),
        JValue::Int(v) => {
            if i32::try_from(*v).is_ok() {
                format!("{INTEGER_TYPE}{v}")
            } else {
                format!("{LONG_TYPE}{v}")
            }
        }
        JValue::Double(v) => format!("{DOUBLE_TYPE}{v}"),
        JValue::Str(s) => format!("{STRING_TYPE}{}", escape(s)),
        JValue::Bytes(b) => format!("{BYTES_TYPE}{}", BASE64.encode(b)),
        JValue::Object(obj) => format!("{REFERENCE_TYPE}{}", obj.id()),
    })
}

/// A decoded reply.
#[derive(Debug)]
pub enum Answer {
    /// Success carrying a value.
    Value(JValue),
    /// Success carrying a class binding (namespace resolution).
    Class(String),
    /// Success carrying a package marker (namespace resolution).
    Package,
    /// Success carrying a method marker (member lookup).
    Method,
    /// The remote call threw; the payload is the exception object's id.
    JavaException(RemoteObject),
    /// The gateway failed the request without a remote exception object.
    Failure(String),
}

/// Parse one reply line (trailing newline already stripped).
pub fn parse_answer(line: &str) -> Result<Answer> {
    let line = line.strip_prefix(RETURN_MESSAGE).unwrap_or(line);
    let bytes = line.as_bytes();
    let status = *bytes
        .first()
        .ok_or_else(|| Error::protocol("empty reply from gateway"))? as char;
    let tag = bytes.get(1).map(|b| *b as char);
    let payload = line.get(2..).unwrap_or_default();

    match status {
        SUCCESS => decode_success(tag, payload),
        FAILURE => Ok(decode_failure(tag, payload)),
        other => Err(Error::protocol(format!(
            "unknown reply status {other:?} in {line:?}"
        ))),
    }
}

fn decode_success(tag: Option<char>, payload: &str) -> Result<Answer> {
    let Some(tag) = tag else {
        return Err(Error::protocol("success reply without a type tag"));
    };
    let answer = match tag {
        VOID_TYPE => Answer::Value(JValue::Void),
        NULL_TYPE => Answer::Value(JValue::Null),
        BOOLEAN_TYPE => Answer::Value(JValue::Bool(payload.eq_ignore_ascii_case("true"))),
        INTEGER_TYPE | LONG_TYPE => Answer::Value(JValue::Int(payload.parse().map_err(
            |_| Error::protocol(format!("bad integer payload {payload:?}")),
        )?)),
        DOUBLE_TYPE => Answer::Value(JValue::Double(parse_double(payload)?)),
        STRING_TYPE => Answer::Value(JValue::Str(unescape(payload))),
        BYTES_TYPE => Answer::Value(JValue::Bytes(BASE64.decode(payload).map_err(|e| {
            Error::protocol(format!("bad base64 payload: {e}"))
        })?)),
        REFERENCE_TYPE | LIST_TYPE | MAP_TYPE | SET_TYPE | ARRAY_TYPE | ITERATOR_TYPE => {
            Answer::Value(JValue::Object(RemoteObject::new(payload)))
        }
        CLASS_TYPE => Answer::Class(payload.to_string()),
        PACKAGE_TYPE => Answer::Package,
        METHOD_TYPE => Answer::Method,
        other => {
            return Err(Error::protocol(format!(
                "unsupported value tag {other:?} with payload {payload:?}"
            )))
        }
    };
    Ok(answer)
}

fn decode_failure(tag: Option<char>, payload: &str) -> Answer {
    match tag {
        Some(REFERENCE_TYPE) => Answer::JavaException(RemoteObject::new(payload)),
        Some(STRING_TYPE) => Answer::Failure(unescape(payload)),
        Some(other) => Answer::Failure(format!("gateway error (tag {other:?}): {payload}")),
        None => Answer::Failure("unspecified gateway error".to_string()),
    }
}

/// Doubles use Java's text forms, which differ from Rust's for the
/// non-finite values.
fn parse_double(payload: &str) -> Result<f64> {
    match payload {
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        _ => payload
            .parse()
            .map_err(|_| Error::protocol(format!("bad double payload {payload:?}"))),
    }
}
