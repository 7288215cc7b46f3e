use std::path::PathBuf;

/// Errors surfaced by worker supervision and the typed façade calls.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A request/response cycle failed (connect refused, transport error,
    /// correlation mismatch).
    #[error("ipc error: {0}")]
    Rpc(#[from] aniipc_rpc::RpcError),

    /// The worker's response bytes did not decode as the expected record.
    #[error("failed to decode worker response: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The worker binary could not be spawned.
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    /// A worker log file could not be created.
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ServiceError>;
