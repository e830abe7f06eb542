//! Gateway client
//!
//! One TCP connection to the gateway, strictly request/response: each
//! operation writes its command lines and then blocks on the single reply
//! line. Methods take `&mut self`, so one call is in flight at a time,
//! which is exactly the discipline the wire protocol requires.

use std::net::SocketAddr;

use tokio::io::{AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::debug;

use crate::common::{Error, Result};

use super::codec;
use super::protocol::{self, Answer};
use super::types::{JValue, JavaClass, JvmEntity, RemoteObject};

/// Client connection to a running Java gateway.
pub struct Gateway {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    addr: SocketAddr,
}

impl Gateway {
    /// Connect to the gateway listener.
    ///
    /// This is the one step that requires the gateway to already be up; a
    /// refused connection here is fatal to the run, while everything after
    /// it is recoverable per probe.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| Error::GatewayUnreachable {
                addr: addr.to_string(),
                source,
            })?;
        let (read_half, write_half) = stream.into_split();
        debug!("connected to gateway at {addr}");
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            addr,
        })
    }

    /// Handle to the remote entry point object.
    pub fn entry_point(&self) -> RemoteObject {
        RemoteObject::new(protocol::ENTRY_POINT_OBJECT_ID)
    }

    /// Call a method on a remote object.
    pub async fn invoke(
        &mut self,
        target: &RemoteObject,
        method: &str,
        args: Vec<JValue>,
    ) -> Result<JValue> {
        let mut parts = Vec::with_capacity(args.len() + 2);
        parts.push(target.id().to_string());
        parts.push(method.to_string());
        encode_args(&mut parts, &args)?;
        self.request_value(protocol::CALL_COMMAND, parts).await
    }

    /// Call a method on the entry point.
    pub async fn invoke_entry(&mut self, method: &str, args: Vec<JValue>) -> Result<JValue> {
        let entry = self.entry_point();
        self.invoke(&entry, method, args).await
    }

    /// Resolve a dotted name in the JVM namespace to a class or package.
    pub async fn resolve(&mut self, name: &str) -> Result<JvmEntity> {
        let parts = vec![
            protocol::REFL_GET_UNKNOWN.to_string(),
            name.to_string(),
            protocol::DEFAULT_JVM_VIEW_ID.to_string(),
        ];
        match self.request(protocol::REFLECTION_COMMAND, &parts).await? {
            Answer::Class(fqn) => Ok(JvmEntity::Class(JavaClass::new(fqn))),
            Answer::Package => Ok(JvmEntity::Package(name.to_string())),
            Answer::JavaException(exc) => Err(self.render_java_exception(exc).await),
            Answer::Failure(message) => Err(Error::Protocol(message)),
            other => Err(unexpected_answer("resolve", &other)),
        }
    }

    /// Resolve a name that must be a class.
    pub async fn jvm_class(&mut self, name: &str) -> Result<JavaClass> {
        match self.resolve(name).await? {
            JvmEntity::Class(class) => Ok(class),
            JvmEntity::Package(name) => Err(Error::NotAClass(name)),
        }
    }

    /// Call a static method on a class.
    pub async fn call_static(
        &mut self,
        class: &JavaClass,
        method: &str,
        args: Vec<JValue>,
    ) -> Result<JValue> {
        let mut parts = Vec::with_capacity(args.len() + 2);
        parts.push(format!("{}{}", protocol::STATIC_PREFIX, class.fqn()));
        parts.push(method.to_string());
        encode_args(&mut parts, &args)?;
        self.request_value(protocol::CALL_COMMAND, parts).await
    }

    /// Read a static field through the member lookup command. The gateway
    /// answers a method marker when the name is a method, which is a usage
    /// error here, not a remote fault.
    pub async fn static_field(&mut self, class: &JavaClass, field: &str) -> Result<JValue> {
        let parts = vec![
            protocol::REFL_GET_MEMBER.to_string(),
            class.fqn().to_string(),
            field.to_string(),
        ];
        match self.request(protocol::REFLECTION_COMMAND, &parts).await? {
            Answer::Value(value) => Ok(value),
            Answer::Method => Err(Error::NotAField {
                class: class.fqn().to_string(),
                member: field.to_string(),
            }),
            Answer::JavaException(exc) => Err(self.render_java_exception(exc).await),
            Answer::Failure(message) => Err(Error::Protocol(message)),
            other => Err(unexpected_answer("static_field", &other)),
        }
    }

    /// Construct an instance of a class.
    pub async fn construct(
        &mut self,
        class: &JavaClass,
        args: Vec<JValue>,
    ) -> Result<RemoteObject> {
        let mut parts = Vec::with_capacity(args.len() + 1);
        parts.push(class.fqn().to_string());
        encode_args(&mut parts, &args)?;
        self.request_value(protocol::CONSTRUCTOR_COMMAND, parts)
            .await?
            .into_object()
    }

    /// Release a gateway-side object binding.
    pub async fn detach(&mut self, object: &RemoteObject) -> Result<()> {
        let parts = vec![
            protocol::MEMORY_DELETE.to_string(),
            object.id().to_string(),
        ];
        match self.request(protocol::MEMORY_COMMAND, &parts).await? {
            Answer::Value(JValue::Void) => Ok(()),
            Answer::Failure(message) => Err(Error::Protocol(message)),
            other => Err(unexpected_answer("detach", &other)),
        }
    }

    /// Flush and shut down the connection. The gateway treats the closed
    /// socket as the end of the session.
    pub async fn close(mut self) -> Result<()> {
        self.writer.shutdown().await?;
        debug!("closed gateway connection to {}", self.addr);
        Ok(())
    }

    /// Send one command and decode its reply line.
    async fn request(&mut self, command: &str, parts: &[String]) -> Result<Answer> {
        debug!("gateway >>> {command} {parts:?}");
        codec::write_request(&mut self.writer, command, parts).await?;
        let line = codec::read_reply(&mut self.reader).await?;
        debug!("gateway <<< {line}");
        protocol::parse_answer(&line)
    }

    /// Send a command whose reply must be a plain value, turning remote
    /// exceptions into errors that carry the exception's own rendering.
    async fn request_value(&mut self, command: &str, parts: Vec<String>) -> Result<JValue> {
        match self.request(command, &parts).await? {
            Answer::Value(value) => Ok(value),
            Answer::JavaException(exc) => Err(self.render_java_exception(exc).await),
            Answer::Failure(message) => Err(Error::Protocol(message)),
            other => Err(unexpected_answer(command, &other)),
        }
    }

    /// One extra round trip to toString the remote exception. Deliberately
    /// bypasses `request_value` so a throwing toString cannot recurse; if
    /// the rendering fails, the bare reference stands in.
    async fn render_java_exception(&mut self, exception: RemoteObject) -> Error {
        let parts = vec![exception.id().to_string(), "toString".to_string()];
        match self.request(protocol::CALL_COMMAND, &parts).await {
            Ok(Answer::Value(JValue::Str(text))) => Error::JavaException(text),
            _ => Error::JavaException(format!("remote exception {exception}")),
        }
    }
}

fn encode_args(parts: &mut Vec<String>, args: &[JValue]) -> Result<()> {
    for arg in args {
        parts.push(protocol::encode_argument(arg)?);
    }
    Ok(())
}

fn unexpected_answer(context: &str, answer: &Answer) -> Error {
    Error::protocol(format!("unexpected reply to {context}: {answer:?}"))
}
