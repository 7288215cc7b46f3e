//! Local transport layer for the ani-album IPC subsystem.
//!
//! Maps logical endpoint tokens (e.g. `"thumbnail-service"`) to platform
//! transport paths and provides the connected byte stream everything else
//! builds on:
//! - Unix domain sockets (Linux/macOS)
//! - Named pipe paths (Windows, path resolution only)

pub mod endpoint;
pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod uds;

pub use endpoint::{PathScheme, TOKEN_PREFIX};
pub use error::{Result, TransportError};
pub use stream::IpcStream;

#[cfg(unix)]
pub use uds::UnixDomainSocket;
