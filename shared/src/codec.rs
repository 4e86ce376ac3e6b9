//! Newline-delimited codec for the command stream
//!
//! Every command travels as one ASCII line:
//! ```text
//! <name> <arg>* [\r] \n
//! ```
//!
//! Line boundaries are recovered from the TCP byte stream by [`LineDecoder`],
//! which never buffers more than its configured capacity.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::protocol::RECV_BUFFER_SIZE;

/// Errors that can occur while decoding lines
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("Line too long: {len} bytes without newline (max: {max})")]
    LineTooLong { len: usize, max: usize },
}

/// Remove every carriage return and line feed, wherever it appears
pub fn strip_line_endings(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

/// Encode a command as a newline-terminated line
pub fn encode_line(command: &str) -> Bytes {
    let command = strip_line_endings(command);
    let mut buf = BytesMut::with_capacity(command.len() + 1);
    buf.put_slice(command.as_bytes());
    buf.put_u8(b'\n');
    buf.freeze()
}

/// Streaming line decoder with a fixed capacity
#[derive(Debug)]
pub struct LineDecoder {
    buffer: BytesMut,
    max_len: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(RECV_BUFFER_SIZE)
    }
}

impl LineDecoder {
    /// Create a decoder that accepts lines of at most `max_len` bytes,
    /// terminator included
    pub fn new(max_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_len),
            max_len,
        }
    }

    /// Add received data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next line from the buffer
    ///
    /// Returns:
    /// - `Ok(Some(line))` with the raw line, terminator included
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the pending line cannot fit the capacity
    pub fn decode_next(&mut self) -> Result<Option<String>, CodecError> {
        match self.buffer.iter().position(|b| *b == b'\n') {
            Some(pos) if pos < self.max_len => {
                let line = self.buffer.split_to(pos + 1);
                Ok(Some(String::from_utf8_lossy(&line).into_owned()))
            }
            Some(pos) => Err(CodecError::LineTooLong {
                len: pos + 1,
                max: self.max_len,
            }),
            None if self.buffer.len() >= self.max_len => Err(CodecError::LineTooLong {
                len: self.buffer.len(),
                max: self.max_len,
            }),
            None => Ok(None),
        }
    }

    /// Take whatever is left once the peer has stopped sending, as a final
    /// unterminated line
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split();
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    /// Bytes received but not yet decoded
    pub fn remaining(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length (for debugging)
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}
