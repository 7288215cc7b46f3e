use std::fs::File;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use aniipc_rpc::{ClientConfig, IpcClient};
use aniipc_transport::PathScheme;
use bytes::Bytes;
use prost::Message as _;
use tracing::{debug, error, info};

use crate::error::{Result, ServiceError};
use crate::proto::{
    message_type_name, ExifInfo, GenerateThumbnailsRequest, GenerateThumbnailsResponse,
    MessageType, ReadExifRequest, Thumbnail, ThumbnailType,
};

/// Endpoint token the thumbnail worker listens on.
pub const THUMBNAIL_SERVICE_TOKEN: &str = "thumbnail-service";

const THUMBNAILS_STDOUT_LOG: &str = "thumbnails_stdout.log";
const THUMBNAILS_STDERR_LOG: &str = "thumbnails_stderr.log";

#[cfg(not(windows))]
const THUMBNAIL_BINARY: &str = "thumbnail";
#[cfg(windows)]
const THUMBNAIL_BINARY: &str = "ani-thumbnail.exe";

/// Injected path configuration for worker binaries and their log capture.
///
/// The install and logs directories come from the host application's path
/// service; nothing here reads ambient global state.
#[derive(Debug, Clone)]
pub struct ServicePaths {
    install_dir: PathBuf,
    logs_dir: PathBuf,
    thumbnails_binary: Option<PathBuf>,
}

impl ServicePaths {
    pub fn new(install_dir: impl Into<PathBuf>, logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            logs_dir: logs_dir.into(),
            thumbnails_binary: None,
        }
    }

    /// Override the thumbnail worker binary location (defaults to the
    /// platform layout under the install directory).
    pub fn with_thumbnails_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.thumbnails_binary = Some(path.into());
        self
    }

    /// Resolved worker binary path:
    /// `<install_dir>/bin/<platform>/<binary>` unless overridden.
    pub fn thumbnails_binary(&self) -> PathBuf {
        self.thumbnails_binary.clone().unwrap_or_else(|| {
            self.install_dir
                .join("bin")
                .join(std::env::consts::OS)
                .join(THUMBNAIL_BINARY)
        })
    }

    /// Directory receiving the worker's captured stdout/stderr.
    pub fn logs_dir(&self) -> &PathBuf {
        &self.logs_dir
    }
}

/// Owns the native thumbnail worker process and the typed operations on top
/// of raw IPC round trips.
///
/// Each façade call opens a fresh client connection, runs one complete
/// request/response cycle, and closes the connection — success or failure.
/// A dead or never-started worker surfaces as a connect error on the next
/// call; nothing restarts automatically (see
/// [`WorkerSupervisor::restart_thumbnails_service`]).
pub struct WorkerSupervisor {
    paths: ServicePaths,
    scheme: PathScheme,
    token: String,
    client_config: ClientConfig,
    thumbnails: Option<Child>,
}

impl WorkerSupervisor {
    pub fn new(paths: ServicePaths, scheme: PathScheme) -> Self {
        Self {
            paths,
            scheme,
            token: THUMBNAIL_SERVICE_TOKEN.to_string(),
            client_config: ClientConfig::default(),
            thumbnails: None,
        }
    }

    /// Override the per-call client configuration (timeouts, size caps).
    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Override the endpoint token (diagnostics and stub-worker testing;
    /// production workers listen on [`THUMBNAIL_SERVICE_TOKEN`]).
    pub fn with_endpoint_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Start every worker service, logging failures instead of propagating
    /// them: a worker that cannot start takes its feature down, not the
    /// host application.
    pub fn start_all_services(&mut self) {
        if let Err(err) = self.start_thumbnails_service() {
            error!(error = %err, "failed to start thumbnails service");
        }
    }

    /// Spawn the thumbnail worker with stdin piped and stdout/stderr
    /// redirected to log files under the logs directory.
    pub fn start_thumbnails_service(&mut self) -> Result<()> {
        let binary = self.paths.thumbnails_binary();
        let stdout_log = self.open_log(THUMBNAILS_STDOUT_LOG)?;
        let stderr_log = self.open_log(THUMBNAILS_STDERR_LOG)?;

        let child = Command::new(&binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(stdout_log))
            .stderr(Stdio::from(stderr_log))
            .spawn()
            .map_err(|source| ServiceError::Spawn {
                binary: binary.clone(),
                source,
            })?;

        info!(?binary, pid = child.id(), "thumbnails service started");
        self.thumbnails = Some(child);
        Ok(())
    }

    /// Kill any live worker and spawn a fresh one.
    ///
    /// The manual recovery seam: call this after façade calls start failing
    /// with connect errors.
    pub fn restart_thumbnails_service(&mut self) -> Result<()> {
        self.stop();
        self.start_thumbnails_service()
    }

    /// Terminate the worker. Also runs on drop.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.thumbnails.take() {
            let _ = child.kill();
            let _ = child.wait();
            info!("thumbnails service stopped");
        }
    }

    /// Whether the spawned worker is still alive.
    pub fn is_running(&mut self) -> bool {
        match self.thumbnails.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Zero-body liveness round trip.
    pub fn ping(&self) -> Result<()> {
        self.round_trip(MessageType::Ping, &[]).map(|_| ())
    }

    /// Ask the worker to generate the full thumbnail size set for one photo.
    pub fn generate_thumbnails(&self, path: &str, out_dir: &str) -> Result<Vec<Thumbnail>> {
        let request = GenerateThumbnailsRequest {
            path: path.to_string(),
            out_dir: out_dir.to_string(),
            types: ThumbnailType::ALL.map(|t| t as i32).to_vec(),
        };

        let result = self
            .round_trip(MessageType::GenerateThumbnails, &request.encode_to_vec())
            .and_then(|bytes| {
                GenerateThumbnailsResponse::decode(bytes.as_ref()).map_err(ServiceError::from)
            });

        match result {
            Ok(response) => Ok(response.data),
            Err(err) => {
                error!(path, error = %err, "generateThumbnails failed");
                Err(err)
            }
        }
    }

    /// Ask the worker to extract the EXIF record of one photo.
    pub fn read_exif(&self, path: &str) -> Result<ExifInfo> {
        let request = ReadExifRequest {
            path: path.to_string(),
        };

        let result = self
            .round_trip(MessageType::ReadExif, &request.encode_to_vec())
            .and_then(|bytes| ExifInfo::decode(bytes.as_ref()).map_err(ServiceError::from));

        match result {
            Ok(info) => Ok(info),
            Err(err) => {
                error!(path, error = %err, "readExif failed");
                Err(err)
            }
        }
    }

    /// One complete request/response cycle on a fresh connection.
    ///
    /// The client's `Drop` tears the connection down on every error path.
    fn round_trip(&self, message_type: MessageType, body: &[u8]) -> Result<Bytes> {
        let mut client =
            IpcClient::connect_with_config(self.scheme, &self.token, &self.client_config)?;

        debug!(
            message_type = message_type_name(message_type as i32),
            body_size = body.len(),
            "sending worker request"
        );
        let response = client.send_message(message_type as i32, body)?;
        client.close();
        Ok(response)
    }

    fn open_log(&self, name: &str) -> Result<File> {
        let path = self.paths.logs_dir.join(name);
        File::create(&path).map_err(|source| ServiceError::LogFile { path, source })
    }
}

impl Drop for WorkerSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn make_dirs(tag: &str) -> (PathBuf, PathBuf) {
        let base = std::env::temp_dir().join(format!(
            "aniipc-supervisor-{tag}-{}",
            std::process::id()
        ));
        let install = base.join("install");
        let logs = base.join("logs");
        std::fs::create_dir_all(&install).unwrap();
        std::fs::create_dir_all(&logs).unwrap();
        (install, logs)
    }

    #[test]
    fn default_binary_path_follows_platform_layout() {
        let paths = ServicePaths::new("/opt/ani-album", "/var/log/ani-album");
        let expected = PathBuf::from("/opt/ani-album")
            .join("bin")
            .join(std::env::consts::OS)
            .join(THUMBNAIL_BINARY);
        assert_eq!(paths.thumbnails_binary(), expected);
    }

    #[test]
    fn binary_override_wins() {
        let paths = ServicePaths::new("/opt/ani-album", "/var/log/ani-album")
            .with_thumbnails_binary("/custom/worker");
        assert_eq!(paths.thumbnails_binary(), PathBuf::from("/custom/worker"));
    }

    #[test]
    fn spawn_failure_is_reported_not_fatal() {
        let (install, logs) = make_dirs("spawn-fail");
        let paths = ServicePaths::new(&install, &logs)
            .with_thumbnails_binary(install.join("does-not-exist"));
        let mut supervisor = WorkerSupervisor::new(paths, PathScheme::platform_default());

        let err = supervisor.start_thumbnails_service().unwrap_err();
        assert!(matches!(err, ServiceError::Spawn { .. }));
        assert!(!supervisor.is_running());

        // The swallow-and-log entry point must not panic either.
        supervisor.start_all_services();
        assert!(!supervisor.is_running());

        let _ = std::fs::remove_dir_all(install.parent().unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn spawns_and_stops_worker_process() {
        let (install, logs) = make_dirs("spawn-ok");
        // `cat` with a piped stdin blocks until killed — a stand-in worker.
        let paths = ServicePaths::new(&install, &logs).with_thumbnails_binary("/bin/cat");
        let mut supervisor = WorkerSupervisor::new(paths, PathScheme::platform_default());

        supervisor.start_thumbnails_service().unwrap();
        assert!(supervisor.is_running());
        assert!(logs.join(THUMBNAILS_STDOUT_LOG).exists());
        assert!(logs.join(THUMBNAILS_STDERR_LOG).exists());

        supervisor.stop();
        assert!(!supervisor.is_running());

        let _ = std::fs::remove_dir_all(install.parent().unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn restart_replaces_worker_process() {
        let (install, logs) = make_dirs("restart");
        let paths = ServicePaths::new(&install, &logs).with_thumbnails_binary("/bin/cat");
        let mut supervisor = WorkerSupervisor::new(paths, PathScheme::platform_default());

        supervisor.start_thumbnails_service().unwrap();
        let first_pid = supervisor.thumbnails.as_ref().unwrap().id();

        supervisor.restart_thumbnails_service().unwrap();
        let second_pid = supervisor.thumbnails.as_ref().unwrap().id();
        assert_ne!(first_pid, second_pid);
        assert!(supervisor.is_running());

        supervisor.stop();
        let _ = std::fs::remove_dir_all(install.parent().unwrap());
    }

    #[test]
    fn facade_fails_with_connect_error_when_worker_is_down() {
        let (install, logs) = make_dirs("down");
        let paths = ServicePaths::new(&install, &logs);
        let supervisor = WorkerSupervisor::new(paths, PathScheme::platform_default())
            .with_endpoint_token(format!("down-{}", std::process::id()));

        let err = supervisor.read_exif("/photos/cat.jpg").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rpc(aniipc_rpc::RpcError::Transport(
                aniipc_transport::TransportError::Connect { .. }
            ))
        ));

        let _ = std::fs::remove_dir_all(install.parent().unwrap());
    }
}
