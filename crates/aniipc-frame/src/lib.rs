//! Wire protocol for the ani-album worker services.
//!
//! Every frame is a fixed-size little-endian header followed by `body_size`
//! raw bytes — no delimiters, no checksums:
//! - `message_type` (4B) identifies the logical operation
//! - `request_id` (8B) correlates a response to its request
//! - `body_size` (4B) is the exact byte length of the body
//! - 8 reserved bytes, written as zero
//!
//! [`ExactReader`] turns an arbitrarily-chunked byte stream into the
//! exact-length reads the codec needs; [`FrameWriter`] handles short writes.

pub mod codec;
pub mod error;
pub mod session;
pub mod writer;

pub use codec::{
    decode_header, encode_header, Message, MessageHeader, DEFAULT_MAX_BODY, HEADER_SIZE,
};
pub use error::{FrameError, Result};
pub use session::ExactReader;
pub use writer::FrameWriter;
