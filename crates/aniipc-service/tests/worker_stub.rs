//! Façade calls exercised end-to-end against a deterministic in-process
//! stub standing in for the native thumbnail worker.

use std::thread;
use std::time::Duration;

use aniipc_frame::Message;
use aniipc_rpc::IpcServer;
use aniipc_service::proto::{
    ExifInfo, GenerateThumbnailsRequest, GenerateThumbnailsResponse, MessageType, ReadExifRequest,
    Thumbnail,
};
use aniipc_service::{ServicePaths, WorkerSupervisor};
use aniipc_transport::PathScheme;
use prost::Message as _;

fn stub_handler(message: Message) -> Vec<u8> {
    match MessageType::try_from(message.message_type) {
        Ok(MessageType::Ping) => Vec::new(),
        Ok(MessageType::GenerateThumbnails) => {
            let request = match GenerateThumbnailsRequest::decode(message.content.as_ref()) {
                Ok(request) => request,
                Err(_) => return Vec::new(),
            };
            let response = GenerateThumbnailsResponse {
                data: request
                    .types
                    .iter()
                    .map(|&t| Thumbnail {
                        r#type: t,
                        width: 128 << (t as u32),
                        height: 96 << (t as u32),
                        path: format!("{}/thumb-{t}.jpg", request.out_dir),
                    })
                    .collect(),
            };
            response.encode_to_vec()
        }
        Ok(MessageType::ReadExif) => {
            let request = match ReadExifRequest::decode(message.content.as_ref()) {
                Ok(request) => request,
                Err(_) => return Vec::new(),
            };
            let info = ExifInfo {
                camera_make: "Canon".to_string(),
                camera_model: "EOS R5".to_string(),
                image_width: 8192,
                image_height: 5464,
                original_datetime: "2020:01:26 10:00:00".to_string(),
                f_stop: 1.8,
                iso_speed: 200,
                image_description: request.path,
                ..ExifInfo::default()
            };
            info.encode_to_vec()
        }
        Err(_) => Vec::new(),
    }
}

#[test]
fn facades_round_trip_against_stub_worker() {
    let token = format!("stub-worker-{}", std::process::id());
    let scheme = PathScheme::platform_default();

    let server = IpcServer::bind(scheme, &token, stub_handler).expect("stub should bind");
    thread::spawn(move || {
        let _ = server.serve();
    });
    thread::sleep(Duration::from_millis(50));

    let base = std::env::temp_dir().join(format!("aniipc-facade-{}", std::process::id()));
    std::fs::create_dir_all(&base).unwrap();
    let supervisor = WorkerSupervisor::new(
        ServicePaths::new(base.join("install"), base.join("logs")),
        scheme,
    )
    .with_endpoint_token(token.as_str());

    // Liveness: empty-body request, empty-body response.
    supervisor.ping().expect("ping should succeed");

    // The full size set comes back, one record per variant.
    let thumbnails = supervisor
        .generate_thumbnails("/photos/cat.jpg", "/thumbnails")
        .expect("generateThumbnails should succeed");
    assert_eq!(thumbnails.len(), 3);
    assert_eq!(thumbnails[0].width, 128);
    assert_eq!(thumbnails[1].width, 256);
    assert_eq!(thumbnails[2].width, 512);
    assert!(thumbnails[0].path.starts_with("/thumbnails/"));

    // Identical inputs against a deterministic worker yield equal results.
    let again = supervisor
        .generate_thumbnails("/photos/cat.jpg", "/thumbnails")
        .expect("second call should succeed");
    assert_eq!(thumbnails, again);

    let exif = supervisor
        .read_exif("/photos/cat.jpg")
        .expect("readExif should succeed");
    assert_eq!(exif.camera_make, "Canon");
    assert_eq!(exif.camera_model, "EOS R5");
    assert_eq!(exif.image_width, 8192);
    assert_eq!(exif.image_description, "/photos/cat.jpg");

    let _ = std::fs::remove_dir_all(&base);
}
