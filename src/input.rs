//! Reading and writing frames over network streams.
//!
//! This module bridges raw TCP bytes and [`Frame`] values. It is shared by the
//! server's connection handler and by the batch client.

use std::io::ErrorKind;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::frame::{Frame, FrameError, HEADER_LEN};

/// Errors that can occur while exchanging frames with a peer.
#[derive(Error, Debug, PartialEq)]
pub enum FrameReadError {
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection closed during frame payload")]
    ClosedDuringPayload,
    #[error("Frame error: {0}")]
    FrameError(#[from] FrameError),
}

/// Reads exactly one frame from a stream.
///
/// The header is read first, then exactly as many payload bytes as the header
/// declares. The protocol is not resumable, so a truncated frame is never
/// returned: a peer closing inside the header is a closed connection, and a
/// peer closing after a valid header is reported separately.
///
/// # Returns
///
/// * `Ok(Frame)` - A complete frame
/// * `Err(FrameReadError::ConnectionClosed)` - If the peer closed before the header was complete
/// * `Err(FrameReadError::ClosedDuringPayload)` - If the peer closed before the payload was complete
/// * `Err(FrameReadError::FrameError)` - If the length header is malformed
/// * `Err(FrameReadError::IoError)` - If reading from the stream fails
pub async fn read_frame<R>(reader: &mut R) -> Result<Frame, FrameReadError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    read_exact_or(reader, &mut header, FrameReadError::ConnectionClosed).await?;

    let total_len = Frame::parse_header(&header)?;

    let mut payload = BytesMut::zeroed(total_len - HEADER_LEN);
    read_exact_or(reader, &mut payload[..], FrameReadError::ClosedDuringPayload).await?;

    Ok(Frame::new(payload.freeze()))
}

/// Encodes a frame and writes it to a stream, flushing afterwards.
pub async fn write_frame<W>(writer: &mut W, frame: &Frame) -> Result<(), FrameReadError>
where
    W: AsyncWrite + Unpin,
{
    let encoded = frame.encode()?;

    writer
        .write_all(&encoded)
        .await
        .map_err(|e| FrameReadError::IoError(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| FrameReadError::IoError(e.to_string()))?;

    Ok(())
}

/// Fills `buffer`, mapping an early EOF to `on_eof`.
async fn read_exact_or<R>(
    reader: &mut R,
    buffer: &mut [u8],
    on_eof: FrameReadError,
) -> Result<(), FrameReadError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buffer).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(on_eof),
        Err(e) => Err(FrameReadError::IoError(e.to_string())),
    }
}
