/// Errors that can occur in request/response operations.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Transport-level error (connect refused, bind failed, socket I/O).
    #[error("transport error: {0}")]
    Transport(#[from] aniipc_transport::TransportError),

    /// Frame-level error (malformed header, oversized body, stream I/O,
    /// connection closed mid-frame).
    #[error("frame error: {0}")]
    Frame(#[from] aniipc_frame::FrameError),

    /// The response header carries a different request id than the
    /// outstanding request. Protocol violation; the connection should be
    /// closed by the caller.
    #[error("response request id {received} does not match request {expected}")]
    CorrelationMismatch { expected: i64, received: i64 },
}

pub type Result<T> = std::result::Result<T, RpcError>;
