use aniipc_frame::Message;
use aniipc_rpc::IpcServer;
use aniipc_transport::PathScheme;
use tracing::info;

use crate::cmd::EchoArgs;
use crate::exit::{rpc_error, CliResult, SUCCESS};

/// Bind an endpoint and echo every request body back to its sender.
/// Stands in for the native worker when testing application wiring.
pub fn run(args: EchoArgs) -> CliResult<i32> {
    let scheme = PathScheme::platform_default();
    let server = IpcServer::bind(scheme, &args.token, |message: Message| {
        info!(
            message_type = message.message_type,
            body_size = message.content.len(),
            "echoing frame"
        );
        message.content.to_vec()
    })
    .map_err(|err| rpc_error("bind failed", err))?;

    info!(path = ?server.path(), "echo server listening");
    server.serve().map_err(|err| rpc_error("serve failed", err))?;

    Ok(SUCCESS)
}
