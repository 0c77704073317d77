//! Container decoding for the AXSD sampler.
//!
//! Parses the binary AXSD song container into the IR.

mod axsd_format;
mod reader;

pub use axsd_format::{load_axsd, load_axsd_ptr, AXSD_MAGIC};
pub use reader::ByteReader;

use thiserror::Error;

/// Error type for container decoding.
///
/// Decoding is all-or-nothing: any error means no partial
/// [`axsd_ir::Song`] is produced.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    /// First four bytes are not the AXSD magic.
    #[error("first 4 bytes of this song are not 'AXSD'")]
    BadMagic,
    /// A record tag not in the command table.
    #[error("unknown command tag 0x{0:02X}")]
    UnknownTag(u8),
    /// The buffer ended before a declared payload could be read.
    #[error("song data truncated")]
    Truncated,
    /// A record referenced a channel outside 0..16.
    #[error("channel index {0} out of range")]
    OutOfRangeIndex(u8),
}
