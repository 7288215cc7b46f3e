use std::io::IsTerminal;

use aniipc_service::proto::{ExifInfo, Thumbnail};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Text
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ResponseOutput {
    body_size: usize,
    body: String,
    elapsed_ms: u128,
}

pub fn print_response(body: &[u8], elapsed_ms: u128, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ResponseOutput {
                body_size: body.len(),
                body: payload_preview(body),
                elapsed_ms,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Text => {
            println!(
                "response: {} bytes in {elapsed_ms}ms: {}",
                body.len(),
                payload_preview(body)
            );
        }
    }
}

pub fn print_thumbnails(thumbnails: &[Thumbnail], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<_> = thumbnails
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": t.r#type,
                        "width": t.width,
                        "height": t.height,
                        "path": t.path,
                    })
                })
                .collect();
            println!("{}", serde_json::Value::Array(out));
        }
        OutputFormat::Text => {
            for t in thumbnails {
                println!("{}x{} -> {}", t.width, t.height, t.path);
            }
        }
    }
}

pub fn print_exif(info: &ExifInfo, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "camera_make": info.camera_make,
                "camera_model": info.camera_model,
                "software": info.software,
                "image_width": info.image_width,
                "image_height": info.image_height,
                "image_orientation": info.image_orientation,
                "original_datetime": info.original_datetime,
                "exposure_time": info.exposure_time,
                "f_stop": info.f_stop,
                "iso_speed": info.iso_speed,
                "lens_focal_length": info.lens_focal_length,
                "gps_latitude": info.gps_latitude,
                "gps_longitude": info.gps_longitude,
                "gps_altitude": info.gps_altitude,
            });
            println!("{out}");
        }
        OutputFormat::Text => {
            println!("camera: {} {}", info.camera_make, info.camera_model);
            println!("image: {}x{}", info.image_width, info.image_height);
            println!("taken: {}", info.original_datetime);
            println!(
                "exposure: {}s f/{} iso {}",
                info.exposure_time, info.f_stop, info.iso_speed
            );
            if info.gps_latitude != 0.0 || info.gps_longitude != 0.0 {
                println!(
                    "gps: {} {} alt {}",
                    info.gps_latitude, info.gps_longitude, info.gps_altitude
                );
            }
        }
    }
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
