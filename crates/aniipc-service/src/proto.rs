//! Payload records exchanged with the thumbnail worker.
//!
//! These mirror the external `ipc.proto` contract the worker binary is
//! compiled against; the IPC core consumes this schema, it does not own it.
//! Requests and responses cross the wire as protobuf-encoded frame bodies.

/// Logical operation carried in a frame's `message_type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    Ping = 0,
    GenerateThumbnails = 1,
    ReadExif = 2,
}

/// Thumbnail size variant. Every generate request enumerates the full set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ThumbnailType {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl ThumbnailType {
    /// All size variants, in the order the worker expects them.
    pub const ALL: [ThumbnailType; 3] = [
        ThumbnailType::Small,
        ThumbnailType::Medium,
        ThumbnailType::Large,
    ];
}

/// Human-readable name of a `message_type` value, for logs and diagnostics.
pub fn message_type_name(value: i32) -> &'static str {
    match MessageType::try_from(value) {
        Ok(MessageType::Ping) => "Ping",
        Ok(MessageType::GenerateThumbnails) => "GenerateThumbnails",
        Ok(MessageType::ReadExif) => "ReadExif",
        Err(_) => "Unknown",
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GenerateThumbnailsRequest {
    #[prost(string, tag = "1")]
    pub path: String,
    #[prost(string, tag = "2")]
    pub out_dir: String,
    #[prost(enumeration = "ThumbnailType", repeated, tag = "3")]
    pub types: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Thumbnail {
    #[prost(enumeration = "ThumbnailType", tag = "1")]
    pub r#type: i32,
    #[prost(int32, tag = "2")]
    pub width: i32,
    #[prost(int32, tag = "3")]
    pub height: i32,
    #[prost(string, tag = "4")]
    pub path: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GenerateThumbnailsResponse {
    #[prost(message, repeated, tag = "1")]
    pub data: Vec<Thumbnail>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadExifRequest {
    #[prost(string, tag = "1")]
    pub path: String,
}

/// EXIF record the worker extracts from a photo.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ExifInfo {
    #[prost(string, tag = "1")]
    pub camera_make: String,
    #[prost(string, tag = "2")]
    pub camera_model: String,
    #[prost(string, tag = "3")]
    pub software: String,
    #[prost(uint32, tag = "4")]
    pub bits_per_sample: u32,
    #[prost(uint32, tag = "5")]
    pub image_width: u32,
    #[prost(uint32, tag = "6")]
    pub image_height: u32,
    #[prost(string, tag = "7")]
    pub image_description: String,
    #[prost(uint32, tag = "8")]
    pub image_orientation: u32,
    #[prost(string, tag = "9")]
    pub image_copyright: String,
    #[prost(string, tag = "10")]
    pub image_datetime: String,
    #[prost(string, tag = "11")]
    pub original_datetime: String,
    #[prost(string, tag = "12")]
    pub digitize_datetime: String,
    #[prost(string, tag = "13")]
    pub subsecond_time: String,
    #[prost(double, tag = "14")]
    pub exposure_time: f64,
    #[prost(double, tag = "15")]
    pub f_stop: f64,
    #[prost(uint32, tag = "16")]
    pub iso_speed: u32,
    #[prost(double, tag = "17")]
    pub subject_distance: f64,
    #[prost(double, tag = "18")]
    pub exposure_bias: f64,
    #[prost(uint32, tag = "19")]
    pub flash_used: u32,
    #[prost(uint32, tag = "20")]
    pub metering_mode: u32,
    #[prost(double, tag = "21")]
    pub lens_focal_length: f64,
    #[prost(uint32, tag = "22")]
    pub focal_length_35mm: u32,
    #[prost(double, tag = "23")]
    pub gps_latitude: f64,
    #[prost(double, tag = "24")]
    pub gps_longitude: f64,
    #[prost(double, tag = "25")]
    pub gps_altitude: f64,
}
