//! Batch client: replays a request file against a tuple space server.
//!
//! Each non empty line of the file is `OPERATION key [value]`. Valid lines are
//! sent one at a time and the reply is printed as `<line>: <reply>`, in file
//! order. Invalid lines are reported and skipped without contacting the server.

use std::io::Write;

use anyhow::Context;
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite},
    net::TcpStream,
};
use tracing::debug;

use crate::{
    frame::Frame,
    input::{read_frame, write_frame, FrameReadError},
};

/// Longest key (READ/GET) or `key + ' ' + value` (PUT) the client will send.
///
/// Stricter than the frame limit so the command word and separators always fit.
pub const MAX_ENTRY_LEN: usize = 970;

/// Reasons a request line is skipped.
#[derive(Error, Debug, PartialEq)]
pub enum ClientError {
    #[error("Invalid {0} entry: {1}")]
    InvalidEntry(String, String),
    #[error("Entry too long, skipping: {0}")]
    EntryTooLong(String),
    #[error("Unknown operation, skipping: {0}")]
    UnknownOperation(String),
}

/// A validated request line.
#[derive(Debug, PartialEq)]
pub struct Request {
    /// The trimmed line, echoed in front of the reply
    pub line: String,
    /// The payload sent to the server
    pub payload: String,
}

impl Request {
    /// Validates one line of a request file.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Request))` - A request ready to be sent
    /// * `Ok(None)` - If the line is empty
    /// * `Err(ClientError)` - If the line is malformed or too long
    pub fn from_line(line: &str) -> Result<Option<Self>, ClientError> {
        let line = line.trim();

        if line.is_empty() {
            return Ok(None);
        }

        let parts: Vec<&str> = line.splitn(3, ' ').collect();

        let payload = match parts[0] {
            "PUT" => {
                if parts.len() < 3 {
                    return Err(ClientError::InvalidEntry("PUT".into(), line.into()));
                }

                let (key, value) = (parts[1], parts[2]);

                if key.len() + 1 + value.len() > MAX_ENTRY_LEN {
                    return Err(ClientError::EntryTooLong(line.into()));
                }

                format!("PUT {} {}", key, value)
            }
            operation @ ("READ" | "GET") => {
                if parts.len() < 2 {
                    return Err(ClientError::InvalidEntry(operation.into(), line.into()));
                }

                let key = parts[1];

                if key.len() > MAX_ENTRY_LEN {
                    return Err(ClientError::EntryTooLong(line.into()));
                }

                format!("{} {}", operation, key)
            }
            _ => return Err(ClientError::UnknownOperation(line.into())),
        };

        Ok(Some(Request {
            line: line.to_string(),
            payload,
        }))
    }
}

/// A connection to a tuple space server.
pub struct TupleSpaceClient<S> {
    stream: S,
}

impl TupleSpaceClient<TcpStream> {
    pub async fn connect(address: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        Ok(Self::new(stream))
    }
}

impl<S> TupleSpaceClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        TupleSpaceClient { stream }
    }

    /// Sends one request payload and waits for the reply text.
    pub async fn send_request(&mut self, payload: &str) -> Result<String, FrameReadError> {
        write_frame(&mut self.stream, &Frame::new(payload.to_string())).await?;

        let reply = read_frame(&mut self.stream).await?;

        Ok(reply.text()?.to_string())
    }
}

/// Sends every valid line of `lines` and writes the transcript to `out`.
///
/// Stops early if the server hangs up, after printing
/// `Connection closed by server` or, when the reply was cut short,
/// `Connection closed by server during recv`.
pub async fn run_batch<R, S, W>(
    lines: R,
    client: &mut TupleSpaceClient<S>,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
    W: Write,
{
    let mut lines = lines.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read request file")?
    {
        let request = match Request::from_line(&line) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        debug!(payload = %request.payload, "sending request");

        match client.send_request(&request.payload).await {
            Ok(reply) => writeln!(out, "{}: {}", request.line, reply)?,
            Err(FrameReadError::ConnectionClosed) => {
                writeln!(out, "Connection closed by server")?;
                break;
            }
            Err(FrameReadError::ClosedDuringPayload) => {
                writeln!(out, "Connection closed by server during recv")?;
                break;
            }
            Err(e) => return Err(e).context("failed to exchange request with server"),
        }
    }

    Ok(())
}
