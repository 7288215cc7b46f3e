use std::time::Duration;

use aniipc_frame::{ExactReader, FrameError, FrameWriter, MessageHeader, DEFAULT_MAX_BODY};
use aniipc_transport::{IpcStream, PathScheme};
use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, RpcError};

/// Default read/write timeout for a round trip. An unresponsive worker
/// fails the call instead of stalling the caller indefinitely.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Client behavior configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Socket read timeout. `None` blocks without limit.
    pub read_timeout: Option<Duration>,
    /// Socket write timeout. `None` blocks without limit.
    pub write_timeout: Option<Duration>,
    /// Maximum accepted request/response body size.
    pub max_body_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_timeout: Some(DEFAULT_CALL_TIMEOUT),
            write_timeout: Some(DEFAULT_CALL_TIMEOUT),
            max_body_size: DEFAULT_MAX_BODY,
        }
    }
}

/// One-shot request/response connection to a named endpoint.
///
/// Requests are strictly sequential: `send_message` takes `&mut self` and
/// completes one full round trip per call, so there is never more than one
/// outstanding read on the connection's reassembly session.
pub struct IpcClient {
    reader: ExactReader<IpcStream>,
    writer: FrameWriter<IpcStream>,
    req_id_counter: i64,
    max_body_size: usize,
    closed: bool,
}

impl std::fmt::Debug for IpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcClient")
            .field("req_id_counter", &self.req_id_counter)
            .field("max_body_size", &self.max_body_size)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl IpcClient {
    /// Connect to the endpoint named by `token` with default configuration.
    pub fn connect(scheme: PathScheme, token: &str) -> Result<Self> {
        Self::connect_with_config(scheme, token, &ClientConfig::default())
    }

    /// Connect with explicit configuration.
    pub fn connect_with_config(
        scheme: PathScheme,
        token: &str,
        config: &ClientConfig,
    ) -> Result<Self> {
        let path = scheme.resolve(token)?;

        #[cfg(not(unix))]
        {
            let _ = config;
            return Err(aniipc_transport::TransportError::Connect {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "named pipe streams are not implemented on this platform",
                ),
            }
            .into());
        }

        #[cfg(unix)]
        {
            let stream = aniipc_transport::UnixDomainSocket::connect(&path)?;
            let reader_stream = stream.try_clone()?;

            let reader = ExactReader::with_read_timeout(reader_stream, config.read_timeout)?;
            let writer = FrameWriter::with_write_timeout(stream, config.write_timeout)?;

            debug!(?path, token, "connected");

            Ok(Self {
                reader,
                writer,
                req_id_counter: 0,
                max_body_size: config.max_body_size,
                closed: false,
            })
        }
    }

    /// Send one request and await its correlated response (blocking).
    ///
    /// Writes the header, then the body if non-empty; reads back exactly one
    /// header and rejects it unless its request id matches; resolves to the
    /// response body (empty when the response carries none).
    pub fn send_message(&mut self, message_type: i32, body: &[u8]) -> Result<Bytes> {
        if body.len() > self.max_body_size {
            return Err(FrameError::BodyTooLarge {
                size: body.len(),
                max: self.max_body_size,
            }
            .into());
        }

        let request_id = self.req_id_counter;
        self.req_id_counter += 1;

        let header = MessageHeader {
            message_type,
            request_id,
            body_size: body.len() as u32,
        };
        self.writer.send(&header, body)?;

        let response = self.reader.read_header()?;
        if response.request_id != request_id {
            return Err(RpcError::CorrelationMismatch {
                expected: request_id,
                received: response.request_id,
            });
        }

        if response.body_size == 0 {
            return Ok(Bytes::new());
        }

        let size = response.body_size as usize;
        if size > self.max_body_size {
            return Err(FrameError::BodyTooLarge {
                size,
                max: self.max_body_size,
            }
            .into());
        }

        Ok(self.reader.read_exactly(size)?)
    }

    /// Forcibly tear down the connection.
    ///
    /// Idempotent, and safe to call whether or not a request is in flight:
    /// shutdown fails any pending read or write on the socket.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.writer.get_ref().shutdown();
        }
    }

    /// A handle that can close this connection from another thread while a
    /// call is blocked on it.
    pub fn close_handle(&self) -> Result<CloseHandle> {
        Ok(CloseHandle {
            stream: self.writer.get_ref().try_clone()?,
        })
    }
}

impl Drop for IpcClient {
    fn drop(&mut self) {
        self.close();
    }
}

/// Cloned-descriptor handle for cancelling an in-flight call.
pub struct CloseHandle {
    stream: IpcStream,
}

impl CloseHandle {
    /// Shut down the connection; any pending read fails rather than hangs.
    pub fn close(&self) {
        let _ = self.stream.shutdown();
    }
}
