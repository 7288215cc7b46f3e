use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod echo;
pub mod exif;
pub mod ping;
pub mod send;
pub mod thumbnails;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Round-trip an empty ping frame to a worker endpoint.
    Ping(PingArgs),
    /// Send a raw frame and print the response.
    Send(SendArgs),
    /// Read EXIF data for a photo through the worker.
    Exif(ExifArgs),
    /// Generate the full thumbnail set for a photo through the worker.
    Thumbnails(ThumbnailsArgs),
    /// Run an echo server on an endpoint (for wiring tests).
    Echo(EchoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ping(args) => ping::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Exif(args) => exif::run(args, format),
        Command::Thumbnails(args) => thumbnails::run(args, format),
        Command::Echo(args) => echo::run(args),
    }
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Endpoint token (e.g. thumbnail-service).
    pub token: String,
    /// Round-trip timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Endpoint token to connect to.
    pub token: String,
    /// Message type value.
    #[arg(long = "type", short = 't', default_value = "0")]
    pub message_type: i32,
    /// Raw string payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Round-trip timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ExifArgs {
    /// Photo path to read EXIF from.
    pub path: String,
    /// Endpoint token the worker listens on.
    #[arg(long, default_value = aniipc_service::THUMBNAIL_SERVICE_TOKEN)]
    pub token: String,
    /// Round-trip timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "10s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ThumbnailsArgs {
    /// Source photo path.
    pub path: String,
    /// Directory the worker writes thumbnails into.
    pub out_dir: String,
    /// Endpoint token the worker listens on.
    #[arg(long, default_value = aniipc_service::THUMBNAIL_SERVICE_TOKEN)]
    pub token: String,
    /// Round-trip timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "30s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct EchoArgs {
    /// Endpoint token to bind.
    pub token: String,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
