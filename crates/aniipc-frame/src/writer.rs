use std::io::{ErrorKind, Write};
use std::time::Duration;

use aniipc_transport::IpcStream;
use bytes::BytesMut;

use crate::codec::{encode_header, MessageHeader};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` stream.
///
/// The header and body are buffered and written together; short writes,
/// `Interrupted`, and `WouldBlock` are retried until the frame is fully on
/// the wire.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and send one frame (blocking).
    ///
    /// `header.body_size` must equal `body.len()`.
    pub fn send(&mut self, header: &MessageHeader, body: &[u8]) -> Result<()> {
        debug_assert_eq!(header.body_size as usize, body.len());

        self.buf.clear();
        encode_header(header, &mut self.buf);
        if !body.is_empty() {
            self.buf.extend_from_slice(body);
        }

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameWriter<IpcStream> {
    /// Create a frame writer over an `IpcStream` with a write timeout applied.
    pub fn with_write_timeout(inner: IpcStream, timeout: Option<Duration>) -> Result<Self> {
        inner
            .set_write_timeout(timeout)
            .map_err(|err| FrameError::Io(std::io::Error::other(err.to_string())))?;
        Ok(Self::new(inner))
    }
}
