use std::path::PathBuf;

use crate::error::{Result, TransportError};

/// Prefix applied to every endpoint path, namespacing ani-album sockets
/// away from other software sharing `/tmp` or the pipe namespace.
pub const TOKEN_PREFIX: &str = "ani-";

/// Maximum accepted token length.
pub const MAX_TOKEN_LEN: usize = 64;

/// Resolves logical endpoint tokens to platform transport paths.
///
/// Selected once at startup via [`PathScheme::platform_default`]; the rest
/// of the workspace never branches on the platform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathScheme {
    /// Filesystem Unix domain socket: `/tmp/ani-<token>`.
    UnixSocket,
    /// Windows named pipe: `\\.\pipe\ani-<token>`.
    NamedPipe,
}

impl PathScheme {
    /// The scheme for the current platform.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            PathScheme::NamedPipe
        } else {
            PathScheme::UnixSocket
        }
    }

    /// Resolve a token to its transport path.
    pub fn resolve(&self, token: &str) -> Result<PathBuf> {
        validate_token(token)?;
        let path = match self {
            PathScheme::UnixSocket => format!("/tmp/{TOKEN_PREFIX}{token}"),
            PathScheme::NamedPipe => format!(r"\\.\pipe\{TOKEN_PREFIX}{token}"),
        };
        Ok(PathBuf::from(path))
    }
}

fn validate_token(token: &str) -> Result<()> {
    let ok = !token.is_empty()
        && token.len() <= MAX_TOKEN_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(TransportError::InvalidToken(token.to_string()))
    }
}
