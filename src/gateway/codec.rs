//! Wire framing: request writing and reply reading
//!
//! Requests and replies are newline-framed:
//!
//! ```text
//! c\nt\nadd\ni3\ni4\ne\n      =>      !yi7\n
//! ```
//!
//! A request is buffered and written as one flush so the gateway never sees
//! a partial command. Replies are single lines; escaped string payloads
//! cannot contain a raw newline, so line framing is enough.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::common::{Error, Result};

use super::protocol::END;

/// Hard cap on a single reply line. Nothing the battery does comes close;
/// anything larger means the peer is not speaking the protocol.
const MAX_REPLY_BYTES: usize = 16 * 1024 * 1024;

/// Write one request: the command line, its part lines, and the end line.
pub async fn write_request<W: AsyncWrite + Unpin>(
    writer: &mut W,
    command: &str,
    parts: &[String],
) -> Result<()> {
    let size = command.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>() + 4;
    let mut buf = String::with_capacity(size);
    buf.push_str(command);
    buf.push('\n');
    for part in parts {
        buf.push_str(part);
        buf.push('\n');
    }
    buf.push_str(END);
    buf.push('\n');

    writer.write_all(buf.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one reply line, without its line ending.
///
/// EOF before a complete line means the gateway went away mid-request.
pub async fn read_reply<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    let mut limited = reader.take(MAX_REPLY_BYTES as u64 + 1);
    let n = limited.read_line(&mut line).await.map_err(map_closed)?;
    if n == 0 {
        return Err(Error::ConnectionClosed);
    }
    if !line.ends_with('\n') {
        if line.len() > MAX_REPLY_BYTES {
            return Err(Error::protocol(format!(
                "reply line exceeds {MAX_REPLY_BYTES} bytes"
            )));
        }
        return Err(Error::ConnectionClosed);
    }
    line.pop();
    if line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

fn map_closed(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::ConnectionClosed
    } else {
        Error::Io(e)
    }
}
