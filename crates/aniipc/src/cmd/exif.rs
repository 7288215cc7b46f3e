use aniipc_rpc::{ClientConfig, IpcClient};
use aniipc_service::proto::{ExifInfo, MessageType, ReadExifRequest};
use aniipc_transport::PathScheme;
use prost::Message as _;

use crate::cmd::{parse_duration, ExifArgs};
use crate::exit::{rpc_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_exif, OutputFormat};

pub fn run(args: ExifArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let config = ClientConfig {
        read_timeout: Some(timeout),
        write_timeout: Some(timeout),
        ..ClientConfig::default()
    };

    let request = ReadExifRequest {
        path: args.path.clone(),
    };

    let scheme = PathScheme::platform_default();
    let mut client = IpcClient::connect_with_config(scheme, &args.token, &config)
        .map_err(|err| rpc_error("connect failed", err))?;

    let response = client
        .send_message(MessageType::ReadExif as i32, &request.encode_to_vec())
        .map_err(|err| rpc_error("readExif failed", err))?;
    client.close();

    let info = ExifInfo::decode(response.as_ref())
        .map_err(|err| CliError::new(DATA_INVALID, format!("bad worker response: {err}")))?;

    print_exif(&info, format);
    Ok(SUCCESS)
}
