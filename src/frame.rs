//! Length-prefixed framing used for both requests and replies.
//!
//! Every message is a three byte, zero padded, ASCII decimal header holding
//! the **total** message length (header included) followed by the payload.
//! A 12 byte payload is therefore sent as `015` + payload. The fixed width
//! header caps a message at 999 bytes, which leaves 996 bytes of payload.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Width of the decimal length header.
pub const HEADER_LEN: usize = 3;
/// Largest total length expressible with a three digit header.
pub const MAX_FRAME_LEN: usize = 999;
/// Largest payload that still fits in a frame.
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - HEADER_LEN;

/// Errors produced while encoding or parsing frames.
#[derive(Error, Debug, PartialEq)]
pub enum FrameError {
    #[error("incomplete frame")]
    Incomplete,
    #[error("invalid length header {0:?}")]
    InvalidHeader(String),
    #[error("declared length {0} is shorter than the header")]
    InvalidLength(usize),
    #[error("payload of {0} bytes does not fit in a frame")]
    PayloadTooLarge(usize),
    #[error("invalid UTF-8 payload")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// A single protocol message, stored without its length header.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    payload: Bytes,
}

impl Frame {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Frame {
            payload: payload.into(),
        }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Decodes the payload as UTF-8 and trims surrounding whitespace.
    pub fn text(&self) -> Result<&str, FrameError> {
        Ok(std::str::from_utf8(&self.payload)?.trim())
    }

    /// Encodes the frame as `header + payload`.
    ///
    /// # Returns
    ///
    /// * `Ok(Bytes)` - The full message, ready to be written to a stream
    /// * `Err(FrameError::PayloadTooLarge)` - If the total length would need more than three digits
    ///
    /// # Examples
    ///
    /// ```
    /// use tuple_space::frame::Frame;
    ///
    /// let encoded = Frame::new("READ a").encode().unwrap();
    /// assert_eq!(&encoded[..], b"009READ a");
    /// ```
    pub fn encode(&self) -> Result<Bytes, FrameError> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge(self.payload.len()));
        }

        let total_len = self.payload.len() + HEADER_LEN;
        let mut buffer = BytesMut::with_capacity(total_len);
        buffer.put_slice(format!("{:03}", total_len).as_bytes());
        buffer.put_slice(&self.payload);

        Ok(buffer.freeze())
    }

    /// Parses the length header and returns the total message length it declares.
    pub fn parse_header(header: &[u8]) -> Result<usize, FrameError> {
        if header.len() < HEADER_LEN {
            return Err(FrameError::Incomplete);
        }

        let header = &header[..HEADER_LEN];

        if !header.iter().all(u8::is_ascii_digit) {
            return Err(FrameError::InvalidHeader(
                String::from_utf8_lossy(header).to_string(),
            ));
        }

        let total_len = header
            .iter()
            .fold(0usize, |acc, digit| acc * 10 + (digit - b'0') as usize);

        if total_len < HEADER_LEN {
            return Err(FrameError::InvalidLength(total_len));
        }

        Ok(total_len)
    }

    /// Parses one complete message from the start of `input`.
    ///
    /// Returns the frame together with the number of bytes it occupied, so the
    /// caller can advance past it. Anything shorter than the declared length is
    /// [`FrameError::Incomplete`]; a truncated message is never returned as a frame.
    #[cfg(test)]
    pub fn parse(input: &[u8]) -> Result<(Frame, usize), FrameError> {
        let total_len = Frame::parse_header(input)?;

        if input.len() < total_len {
            return Err(FrameError::Incomplete);
        }

        let payload = Bytes::copy_from_slice(&input[HEADER_LEN..total_len]);

        Ok((Frame::new(payload), total_len))
    }
}
