use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// On-wire header size. The three fields occupy 16 bytes; the remaining 8
/// are reserved, written as zero and ignored on decode.
pub const HEADER_SIZE: usize = 24;

/// Default maximum body size: 16 MiB.
pub const DEFAULT_MAX_BODY: usize = 16 * 1024 * 1024;

/// Fixed-size record prefixing every frame, little-endian throughout.
///
/// Layout: `message_type` at offset 0 (4B), `request_id` at offset 4 (8B),
/// `body_size` at offset 12 (4B). One layout, used identically by the
/// encode and decode paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Identifies the logical operation (ping, generate-thumbnails, ...).
    pub message_type: i32,
    /// Monotonically increasing per client instance; a response carries the
    /// `request_id` of the request that produced it.
    pub request_id: i64,
    /// Exact byte length of the body that follows (may be zero).
    pub body_size: u32,
}

/// A decoded frame: the unit handed to application handlers and façades.
#[derive(Debug, Clone)]
pub struct Message {
    pub message_type: i32,
    pub content: Bytes,
}

/// Encode a header into its fixed-width binary form.
pub fn encode_header(header: &MessageHeader, dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE);
    dst.put_i32_le(header.message_type);
    dst.put_i64_le(header.request_id);
    dst.put_u32_le(header.body_size);
    dst.put_bytes(0, HEADER_SIZE - 16);
}

/// Decode a header from a buffer of exactly [`HEADER_SIZE`] bytes.
pub fn decode_header(src: &[u8]) -> Result<MessageHeader> {
    if src.len() != HEADER_SIZE {
        return Err(FrameError::MalformedHeader {
            len: src.len(),
            expected: HEADER_SIZE,
        });
    }

    let mut buf = src;
    let message_type = buf.get_i32_le();
    let request_id = buf.get_i64_le();
    let body_size = buf.get_u32_le();
    // Remaining 8 bytes are reserved.

    Ok(MessageHeader {
        message_type,
        request_id,
        body_size,
    })
}
