//! Legacy 128-byte trailing tag codec
//!
//! Layout of the trailer:
//!
//! | offset | length | content                          |
//! |--------|--------|----------------------------------|
//! | 0      | 3      | marker bytes, ASCII `"TAG"`      |
//! | 3      | 30     | title, byte-budgeted, null-padded |
//! | 33     | 30     | artist, byte-budgeted, null-padded |
//! | 63     | 65     | reserved, all null bytes         |
//!
//! Detection checks only the marker bytes. An existing tag is preserved
//! byte-for-byte even when its field contents differ from the requested
//! metadata.

use super::safe_string::truncate_padded;

/// Total length of the trailing tag block
pub const TAG_LEN: usize = 128;
/// Marker bytes identifying an existing tag
pub const TAG_MARKER: &[u8; 3] = b"TAG";
/// Byte budget for the title and artist fields
pub const FIELD_LEN: usize = 30;

/// Whether the resource already carries a trailing tag block.
///
/// Resources shorter than the block length cannot carry one and are treated
/// as untagged.
pub fn has_trailing_tag(bytes: &[u8]) -> bool {
    match bytes.len().checked_sub(TAG_LEN) {
        Some(start) => &bytes[start..start + TAG_MARKER.len()] == TAG_MARKER,
        None => false,
    }
}

/// Build a fresh 128-byte tag block from the supplied fields.
pub fn build_tag(artist: &str, title: &str) -> [u8; TAG_LEN] {
    let mut tag = [0u8; TAG_LEN];
    tag[..3].copy_from_slice(TAG_MARKER);
    tag[3..3 + FIELD_LEN].copy_from_slice(&truncate_padded(title, FIELD_LEN));
    tag[33..33 + FIELD_LEN].copy_from_slice(&truncate_padded(artist, FIELD_LEN));
    // bytes 63..128 stay null
    tag
}

/// Produce the final byte sequence for storage.
///
/// Returns the resource unchanged when a tag is already present; otherwise
/// appends a freshly built block, growing the resource by exactly
/// [`TAG_LEN`] bytes. Pure: no other observable effect.
pub fn finalize(mut bytes: Vec<u8>, artist: &str, title: &str) -> Vec<u8> {
    if has_trailing_tag(&bytes) {
        return bytes;
    }
    bytes.extend_from_slice(&build_tag(artist, title));
    bytes
}
