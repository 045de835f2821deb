//! Frame layout: a 4-byte ASCII tag followed by a deterministic byte ramp.
//!
//! Every frame the sender emits looks like
//!
//! ```text
//! | 'L' 'O' 'R' '1' | 0x00 0x01 0x02 ... |
//!   tag (4 bytes)     ramp, from `offset`
//! ```
//!
//! The ramp value at position `i` is `(i - offset) mod 256`, which lets a
//! receiver check every byte without any framing or checksum of its own.
//!
//! The tag is the only thing a listener looks at. It is compared byte-for-byte
//! against the first four valid bytes of the shared buffer.

/// Length of a frame tag in bytes.
pub const TAG_LEN: usize = 4;

/// A literal 4-byte message identifier.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Tag([u8; TAG_LEN]);

impl Tag {
    /// Tag sent by the button-driven sender and expected by the listener.
    pub const LOR1: Tag = Tag(*b"LOR1");
    /// Reserved second identifier.
    pub const LOR2: Tag = Tag(*b"LOR2");
    /// Reserved third identifier.
    pub const LOR3: Tag = Tag(*b"LOR3");

    /// Builds a tag from raw bytes.
    pub const fn new(bytes: [u8; TAG_LEN]) -> Self {
        Tag(bytes)
    }

    /// The raw tag bytes.
    pub fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }

    /// Returns the tag as text, or `"????"` if it is not valid UTF-8.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("????")
    }

    /// Returns `true` if `frame` starts with this tag.
    ///
    /// Frames shorter than the tag never match.
    pub fn matches(&self, frame: &[u8]) -> bool {
        frame.starts_with(&self.0)
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::LOR1
    }
}

/// Fills `buf` with `tag` followed by a ramp starting at `offset`.
///
/// - The tag is written at the start of the buffer (truncated if the buffer is
///   shorter than the tag).
/// - Bytes between the end of the tag and `offset` are zeroed.
/// - Every position `i >= offset` is set to `(i - offset) mod 256`.
///
/// The whole of `buf` is overwritten, so the result does not depend on what the
/// buffer held before. An `offset` smaller than the tag length lets the ramp
/// overwrite the tail of the tag.
pub fn fill_payload(tag: &Tag, buf: &mut [u8], offset: usize) {
    let tag_len = TAG_LEN.min(buf.len());
    buf[..tag_len].copy_from_slice(&tag.as_bytes()[..tag_len]);
    let gap_end = offset.min(buf.len());
    if tag_len < gap_end {
        buf[tag_len..gap_end].fill(0);
    }
    for (i, b) in buf.iter_mut().enumerate().skip(offset) {
        *b = (i - offset) as u8;
    }
}
