use std::path::Path;
use std::sync::Arc;

use aniipc_frame::{
    ExactReader, FrameError, FrameWriter, Message, MessageHeader, DEFAULT_MAX_BODY,
};
use aniipc_transport::{IpcStream, PathScheme, UnixDomainSocket};
use tracing::{debug, warn};

use crate::error::{Result, RpcError};

/// Application seam: turns one decoded request into response bytes.
///
/// An empty return is valid and produces a header-only response frame.
pub trait MessageHandler: Send + Sync + 'static {
    fn handle(&self, message: Message) -> Vec<u8>;
}

impl<F> MessageHandler for F
where
    F: Fn(Message) -> Vec<u8> + Send + Sync + 'static,
{
    fn handle(&self, message: Message) -> Vec<u8> {
        self(message)
    }
}

/// Server behavior configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum accepted request body size.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY,
        }
    }
}

/// Accepts connections on a named endpoint and dispatches decoded frames to
/// the application handler.
///
/// Each connection is served on its own thread and may carry any number of
/// sequential request/response exchanges. Every handler result is written
/// back to the originating connection under the request's `message_type`
/// and `request_id`.
pub struct IpcServer {
    socket: UnixDomainSocket,
    handler: Arc<dyn MessageHandler>,
    config: ServerConfig,
}

impl std::fmt::Debug for IpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IpcServer {
    /// Bind the endpoint named by `token`.
    ///
    /// Bind failures are fatal at startup and propagate to the caller.
    pub fn bind(scheme: PathScheme, token: &str, handler: impl MessageHandler) -> Result<Self> {
        Self::bind_with_config(scheme, token, handler, ServerConfig::default())
    }

    /// Bind with explicit configuration.
    pub fn bind_with_config(
        scheme: PathScheme,
        token: &str,
        handler: impl MessageHandler,
        config: ServerConfig,
    ) -> Result<Self> {
        let path = scheme.resolve(token)?;
        let socket = UnixDomainSocket::bind(&path)?;
        Ok(Self {
            socket,
            handler: Arc::new(handler),
            config,
        })
    }

    /// The path this server is bound to.
    pub fn path(&self) -> &Path {
        self.socket.path()
    }

    /// Accept and serve connections until the listener fails (blocking).
    pub fn serve(&self) -> Result<()> {
        loop {
            let stream = self.socket.accept()?;
            let handler = Arc::clone(&self.handler);
            let max_body = self.config.max_body_size;
            std::thread::spawn(move || match serve_connection(stream, &*handler, max_body) {
                Ok(()) | Err(RpcError::Frame(FrameError::ConnectionClosed)) => {
                    debug!("client disconnected");
                }
                Err(err) => {
                    warn!(error = %err, "connection terminated");
                }
            });
        }
    }
}

/// Frame loop for one connection: read a complete request (headers and
/// bodies may arrive arbitrarily chunked), dispatch it, write the response
/// back, repeat until the peer disconnects.
fn serve_connection(
    stream: IpcStream,
    handler: &dyn MessageHandler,
    max_body: usize,
) -> Result<()> {
    let reader_stream = stream.try_clone()?;
    let mut session = ExactReader::new(reader_stream);
    let mut writer = FrameWriter::new(stream);

    loop {
        let (header, body) = session.read_frame(max_body)?;
        debug!(
            message_type = header.message_type,
            request_id = header.request_id,
            body_size = header.body_size,
            "dispatching message"
        );

        let response = handler.handle(Message {
            message_type: header.message_type,
            content: body,
        });
        if response.len() > max_body {
            return Err(FrameError::BodyTooLarge {
                size: response.len(),
                max: max_body,
            }
            .into());
        }

        writer.send(
            &MessageHeader {
                message_type: header.message_type,
                request_id: header.request_id,
                body_size: response.len() as u32,
            },
            &response,
        )?;
    }
}
