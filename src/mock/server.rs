//! Mock gateway server
//!
//! Speaks the server side of the wire protocol over TCP. Each connection
//! gets its own object registry, so ids are deterministic per run and
//! concurrent test connections cannot see each other's objects.

use std::io;
use std::net::SocketAddr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::gateway::protocol::{
    escape, unescape, CALL_COMMAND, CONSTRUCTOR_COMMAND, END, ENTRY_POINT_OBJECT_ID,
    MEMORY_COMMAND, MEMORY_DELETE, REFLECTION_COMMAND, REFL_GET_MEMBER, REFL_GET_UNKNOWN,
    STATIC_PREFIX,
};

use super::entry::{self, MockObject, MockReply, MockValue, Registry, Resolution};

/// A running mock gateway listener.
pub struct MockGateway {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockGateway {
    /// Bind `127.0.0.1:port` (0 picks an ephemeral port) and serve in the
    /// background until [`shutdown`](Self::shutdown) or process exit.
    pub async fn spawn(port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let addr = listener.local_addr()?;
        debug!("mock gateway listening on {addr}");
        let handle = tokio::spawn(accept_loop(listener));
        Ok(Self { addr, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections. Connections already being served run
    /// until their client hangs up.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn accept_loop(listener: TcpListener) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("mock gateway accepted {peer}");
                tokio::spawn(async move {
                    if let Err(error) = serve_connection(stream).await {
                        debug!("mock gateway connection ended: {error}");
                    }
                });
            }
            Err(error) => {
                warn!("mock gateway accept failed: {error}");
                break;
            }
        }
    }
}

async fn serve_connection(stream: TcpStream) -> io::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(write_half);
    let mut registry = Registry::default();

    while let Some(request) = read_request(&mut reader).await? {
        debug!("mock <<< {} {:?}", request.command, request.parts);
        let reply = handle_request(&mut registry, &request);
        debug!("mock >>> {}", reply.trim_end());
        writer.write_all(reply.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

struct Request {
    command: String,
    parts: Vec<String>,
}

/// Read one request (command line through `e` line). `None` on a clean EOF
/// between requests, which is how clients end the session.
async fn read_request<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<Option<Request>> {
    let Some(command) = read_trimmed_line(reader).await? else {
        return Ok(None);
    };
    let mut parts = Vec::new();
    loop {
        let Some(line) = read_trimmed_line(reader).await? else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-request",
            ));
        };
        if line == END {
            break;
        }
        parts.push(line);
    }
    Ok(Some(Request { command, parts }))
}

async fn read_trimmed_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

fn handle_request(registry: &mut Registry, request: &Request) -> String {
    let parts = &request.parts;
    match request.command.as_str() {
        CALL_COMMAND => handle_call(registry, parts),
        CONSTRUCTOR_COMMAND => handle_constructor(registry, parts),
        REFLECTION_COMMAND => handle_reflection(registry, parts),
        MEMORY_COMMAND => handle_memory(registry, parts),
        other => failure_reply(&format!("unknown command {other:?}")),
    }
}

fn handle_call(registry: &mut Registry, parts: &[String]) -> String {
    let [target, method, raw_args @ ..] = parts else {
        return failure_reply("malformed call command");
    };
    let args = match parse_args(raw_args) {
        Ok(args) => args,
        Err(message) => return failure_reply(&message),
    };
    let reply = if target == ENTRY_POINT_OBJECT_ID {
        entry::call_entry(registry, method, &args)
    } else if let Some(class) = target.strip_prefix(STATIC_PREFIX) {
        entry::call_static(class, method, &args)
    } else {
        entry::call_object(registry, target, method, &args)
    };
    encode_reply(registry, reply)
}

fn handle_constructor(registry: &mut Registry, parts: &[String]) -> String {
    let [class, raw_args @ ..] = parts else {
        return failure_reply("malformed constructor command");
    };
    let args = match parse_args(raw_args) {
        Ok(args) => args,
        Err(message) => return failure_reply(&message),
    };
    let reply = entry::construct(registry, class, &args);
    encode_reply(registry, reply)
}

fn handle_reflection(registry: &mut Registry, parts: &[String]) -> String {
    match parts {
        [sub, name, _view] if sub == REFL_GET_UNKNOWN => match entry::resolve(name) {
            Some(Resolution::Class(fqn)) => format!("!yc{fqn}\n"),
            Some(Resolution::Package) => "!yp\n".to_string(),
            None => failure_reply(&format!("{name} does not exist in the JVM")),
        },
        [sub, class, member] if sub == REFL_GET_MEMBER => {
            encode_reply(registry, entry::reflect_member(class, member))
        }
        _ => failure_reply("malformed reflection command"),
    }
}

fn handle_memory(registry: &mut Registry, parts: &[String]) -> String {
    match parts {
        [sub, id] if sub == MEMORY_DELETE => {
            // Stale deletes are tolerated; finalizer-driven clients can
            // send them for ids that were already dropped.
            registry.unbind(id);
            "!yv\n".to_string()
        }
        _ => failure_reply("malformed memory command"),
    }
}

fn parse_args(raw: &[String]) -> Result<Vec<MockValue>, String> {
    raw.iter().map(|part| parse_arg(part)).collect()
}

fn parse_arg(part: &str) -> Result<MockValue, String> {
    let tag = part
        .chars()
        .next()
        .ok_or_else(|| "empty argument part".to_string())?;
    let payload = part.get(1..).unwrap_or_default();
    match tag {
        'n' => Ok(MockValue::Null),
        'b' => Ok(MockValue::Bool(payload.eq_ignore_ascii_case("true"))),
        'i' => payload
            .parse()
            .map(MockValue::Int)
            .map_err(|_| format!("bad integer argument {payload:?}")),
        'L' => payload
            .parse()
            .map(MockValue::Long)
            .map_err(|_| format!("bad long argument {payload:?}")),
        'd' => payload
            .parse()
            .map(MockValue::Double)
            .map_err(|_| format!("bad double argument {payload:?}")),
        's' => Ok(MockValue::Str(unescape(payload))),
        'j' => BASE64
            .decode(payload)
            .map(MockValue::Bytes)
            .map_err(|e| format!("bad base64 argument: {e}")),
        'r' => Ok(MockValue::Ref(payload.to_string())),
        other => Err(format!("unsupported argument tag {other:?}")),
    }
}

fn encode_reply(registry: &mut Registry, reply: MockReply) -> String {
    match reply {
        MockReply::Value(value) => format!("!y{}\n", encode_value(registry, &value)),
        MockReply::Method => "!ym\n".to_string(),
        MockReply::Throw { class, message } => {
            let id = registry.put(MockObject::Exception(format!("{class}: {message}")));
            format!("!xr{id}\n")
        }
        MockReply::Fail(message) => failure_reply(&message),
    }
}

fn failure_reply(message: &str) -> String {
    format!("!xs{}\n", escape(message))
}

fn encode_value(registry: &Registry, value: &MockValue) -> String {
    match value {
        MockValue::Null => "n".to_string(),
        MockValue::Void => "v".to_string(),
        MockValue::Bool(b) => format!("b{b}"),
        MockValue::Int(v) => format!("i{v}"),
        MockValue::Long(v) => format!("L{v}"),
        MockValue::Double(v) => format!("d{}", format_double(*v)),
        MockValue::Str(s) => format!("s{}", escape(s)),
        MockValue::Bytes(b) => format!("j{}", BASE64.encode(b)),
        MockValue::Ref(id) => format!("{}{id}", ref_tag(registry, id)),
    }
}

/// Collection handles answer under their kind's tag; everything else is a
/// plain reference.
fn ref_tag(registry: &Registry, id: &str) -> char {
    let object = registry
        .index_of(id)
        .and_then(|index| registry.object(index));
    match object {
        Some(MockObject::List(_)) => 'l',
        Some(MockObject::Set(_)) => 'h',
        Some(MockObject::Map(_)) => 'a',
        _ => 'r',
    }
}

/// Doubles go out in Java's text forms.
fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "Infinity".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        v.to_string()
    }
}
