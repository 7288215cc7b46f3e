use std::time::Instant;

use aniipc_rpc::{ClientConfig, IpcClient};
use aniipc_service::proto::MessageType;
use aniipc_transport::PathScheme;

use crate::cmd::{parse_duration, PingArgs};
use crate::exit::{rpc_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: PingArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let config = ClientConfig {
        read_timeout: Some(timeout),
        write_timeout: Some(timeout),
        ..ClientConfig::default()
    };

    let scheme = PathScheme::platform_default();
    let mut client = IpcClient::connect_with_config(scheme, &args.token, &config)
        .map_err(|err| rpc_error("connect failed", err))?;

    let started = Instant::now();
    let response = client
        .send_message(MessageType::Ping as i32, &[])
        .map_err(|err| rpc_error("ping failed", err))?;
    client.close();

    print_response(response.as_ref(), started.elapsed().as_millis(), format);
    Ok(SUCCESS)
}
