use std::io::{ErrorKind, Read};
use std::time::Duration;

use aniipc_transport::IpcStream;
use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::codec::{decode_header, MessageHeader, HEADER_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Per-connection reassembly state: slices an unbounded byte stream into
/// exact-length reads.
///
/// The transport may deliver data in arbitrary, non-message-aligned chunks,
/// or bundle several logical messages into one chunk. `pending` carries the
/// bytes already read but not yet consumed forward to the next call; bytes
/// are never dropped or duplicated.
///
/// One `ExactReader` is owned by exactly one connection, and `&mut self`
/// rules out concurrent outstanding reads on the same session.
pub struct ExactReader<T> {
    inner: T,
    pending: BytesMut,
}

impl<T: Read> ExactReader<T> {
    /// Create a new reassembly session over a stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            pending: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Read exactly `n` bytes (blocking).
    ///
    /// Satisfies the read from `pending` without touching the transport when
    /// enough bytes are already buffered; otherwise accumulates chunks until
    /// `n` bytes have been seen, stashing any excess for the next call.
    ///
    /// EOF before `n` bytes is `FrameError::ConnectionClosed`; transport
    /// errors (including a forced close from another handle) propagate as
    /// `FrameError::Io`.
    pub fn read_exactly(&mut self, n: usize) -> Result<Bytes> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while self.pending.len() < n {
            let read = match self.inner.read(&mut chunk) {
                Ok(count) => count,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.pending.extend_from_slice(&chunk[..read]);
        }

        let out = self.pending.split_to(n).freeze();
        trace!(requested = n, carried = self.pending.len(), "exact read complete");
        Ok(out)
    }

    /// Read and decode one message header.
    pub fn read_header(&mut self) -> Result<MessageHeader> {
        let buf = self.read_exactly(HEADER_SIZE)?;
        decode_header(&buf)
    }

    /// Read one complete frame: header, then exactly `body_size` bytes.
    pub fn read_frame(&mut self, max_body: usize) -> Result<(MessageHeader, Bytes)> {
        let header = self.read_header()?;
        let size = header.body_size as usize;
        if size > max_body {
            return Err(FrameError::BodyTooLarge {
                size,
                max: max_body,
            });
        }
        let body = if size == 0 {
            Bytes::new()
        } else {
            self.read_exactly(size)?
        };
        Ok((header, body))
    }

    /// Number of carried-over bytes not yet consumed.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the session and return the inner stream.
    ///
    /// Any carried-over bytes are discarded.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl ExactReader<IpcStream> {
    /// Create a session over an `IpcStream` with a read timeout applied.
    pub fn with_read_timeout(inner: IpcStream, timeout: Option<Duration>) -> Result<Self> {
        inner
            .set_read_timeout(timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::new(inner))
    }
}

fn transport_to_frame_error(err: aniipc_transport::TransportError) -> FrameError {
    match err {
        aniipc_transport::TransportError::Io(io)
        | aniipc_transport::TransportError::Accept(io) => FrameError::Io(io),
        aniipc_transport::TransportError::Bind { source, .. }
        | aniipc_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
