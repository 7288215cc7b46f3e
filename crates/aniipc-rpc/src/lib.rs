//! One-shot request/response messaging over the ani-album wire protocol.
//!
//! [`IpcClient`] opens a connection to a named endpoint, sends one framed
//! request at a time, and correlates each response by request id.
//! [`IpcServer`] accepts connections and hands decoded messages to an
//! application handler, writing the handler's response back on the same
//! connection.

pub mod client;
pub mod error;
pub mod server;

pub use client::{ClientConfig, CloseHandle, IpcClient, DEFAULT_CALL_TIMEOUT};
pub use error::{Result, RpcError};
pub use server::{IpcServer, MessageHandler, ServerConfig};
