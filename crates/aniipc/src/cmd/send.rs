use std::fs;
use std::time::Instant;

use aniipc_rpc::{ClientConfig, IpcClient};
use aniipc_transport::PathScheme;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{io_error, rpc_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let payload = resolve_payload(&args)?;

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
        .send_message(args.message_type, &payload)
        .map_err(|err| rpc_error("send failed", err))?;
    client.close();

    print_response(response.as_ref(), started.elapsed().as_millis(), format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(data: Option<&str>) -> SendArgs {
        SendArgs {
            token: "test".to_string(),
            message_type: 1,
            data: data.map(str::to_string),
            file: None,
            timeout: "5s".to_string(),
        }
    }

    #[test]
    fn payload_defaults_to_empty() {
        assert!(resolve_payload(&args(None)).unwrap().is_empty());
    }

    #[test]
    fn payload_from_data_flag() {
        assert_eq!(resolve_payload(&args(Some("hi"))).unwrap(), b"hi");
    }

    #[test]
    fn payload_from_missing_file_fails() {
        let mut a = args(None);
        a.file = Some("/no/such/file".into());
        assert!(resolve_payload(&a).is_err());
    }
}
