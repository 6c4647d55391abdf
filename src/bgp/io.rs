//! Reading BGP messages from an asynchronous byte stream.

use std::fmt;

use bytes::{Bytes, BytesMut};
use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::bgp::framer::Framer;
use crate::bgp::message::{Message, MAX_MSG_SIZE};
use crate::util::parser::ParseError;

//------------ FrameReader ---------------------------------------------------

/// Reads BGP messages one at a time from an [`AsyncRead`].
///
/// Received octets are collected in a buffer until it holds a complete
/// message, which is then split off and decoded by the [`Framer`].
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    buffer: BytesMut,
    framer: Framer<Bytes>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Creates a reader using the default [`Framer`].
    pub fn new(reader: R) -> Self {
        Self::with_framer(reader, Framer::default())
    }

    pub fn with_framer(reader: R, framer: Framer<Bytes>) -> Self {
        FrameReader {
            reader,
            buffer: BytesMut::with_capacity(MAX_MSG_SIZE),
            framer,
        }
    }

    /// Returns the next message.
    ///
    /// Returns `Ok(None)` if the stream ended cleanly after a complete
    /// message. A stream ending in the middle of a message results in
    /// [`Error::ConnectionReset`].
    pub async fn read_message(
        &mut self
    ) -> Result<Option<Message<Bytes>>, Error> {
        loop {
            if let Some(msg) = self.framer.take_message(&mut self.buffer)? {
                return Ok(Some(msg));
            }
            if 0 == self.reader.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    debug!("end of stream");
                    return Ok(None);
                }
                warn!(
                    "stream ended with {} octets of incomplete message",
                    self.buffer.len()
                );
                return Err(Error::ConnectionReset);
            }
        }
    }

    /// Returns the octets received but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn framer(&self) -> &Framer<Bytes> {
        &self.framer
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

//------------ Error ---------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Parse(ParseError),
    ConnectionReset,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Parse(e) => write!(f, "parse error: {}", e),
            Error::ConnectionReset => f.write_str("connection reset by peer"),
        }
    }
}

impl std::error::Error for Error { }

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

//------------ Tests ---------------------------------------------------------
