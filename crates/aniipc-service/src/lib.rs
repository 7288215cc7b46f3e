//! Worker-process supervision and the typed thumbnail/EXIF operations.
//!
//! [`WorkerSupervisor`] owns the native thumbnail worker's lifecycle: it
//! spawns the binary with stdout/stderr captured to log files and exposes
//! the façade calls ([`WorkerSupervisor::generate_thumbnails`],
//! [`WorkerSupervisor::read_exif`]) that each run one request/response
//! cycle over a short-lived IPC client.

pub mod error;
pub mod proto;
pub mod supervisor;

pub use error::{Result, ServiceError};
pub use supervisor::{ServicePaths, WorkerSupervisor, THUMBNAIL_SERVICE_TOKEN};
