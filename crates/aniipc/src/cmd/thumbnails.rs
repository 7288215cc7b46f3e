use aniipc_rpc::{ClientConfig, IpcClient};
use aniipc_service::proto::{
    GenerateThumbnailsRequest, GenerateThumbnailsResponse, MessageType, ThumbnailType,
};
use aniipc_transport::PathScheme;
use prost::Message as _;

use crate::cmd::{parse_duration, ThumbnailsArgs};
use crate::exit::{rpc_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_thumbnails, OutputFormat};

pub fn run(args: ThumbnailsArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let config = ClientConfig {
        read_timeout: Some(timeout),
        write_timeout: Some(timeout),
        ..ClientConfig::default()
    };

    let request = GenerateThumbnailsRequest {
        path: args.path.clone(),
        out_dir: args.out_dir.clone(),
        types: ThumbnailType::ALL.map(|t| t as i32).to_vec(),
    };

    let scheme = PathScheme::platform_default();
    let mut client = IpcClient::connect_with_config(scheme, &args.token, &config)
        .map_err(|err| rpc_error("connect failed", err))?;

    let response = client
        .send_message(
            MessageType::GenerateThumbnails as i32,
            &request.encode_to_vec(),
        )
        .map_err(|err| rpc_error("generateThumbnails failed", err))?;
    client.close();

    let decoded = GenerateThumbnailsResponse::decode(response.as_ref())
        .map_err(|err| CliError::new(DATA_INVALID, format!("bad worker response: {err}")))?;

    print_thumbnails(&decoded.data, format);
    Ok(SUCCESS)
}
