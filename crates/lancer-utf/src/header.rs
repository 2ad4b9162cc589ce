//! UTF container header

use binrw::{BinRead, BinWrite};
use std::io::Cursor;

use crate::error::{UtfError, UtfResult};

/// Container tag, including the trailing space
pub const UTF_SIGNATURE: [u8; 4] = *b"UTF ";

/// The only container version this crate reads and writes
pub const UTF_VERSION: u32 = 0x101;

/// Bytes needed to tell whether an input is a UTF container at all
pub const MIN_HEADER_SIZE: usize = 8;

/// Size of the header fields the reader consumes
pub const HEADER_SIZE: usize = 40;

/// Offset of the node block in containers written by [`crate::UtfBuilder`].
///
/// The header is followed by an unused field and a 64-bit file time.
pub const DEFAULT_NODE_BLOCK_OFFSET: usize = 56;

/// UTF container header (little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct UtfHeader {
    /// Tag bytes: "UTF "
    pub signature: [u8; 4],

    /// Format version (0x101)
    pub version: u32,

    /// Absolute offset of the node block
    pub node_block_offset: i32,

    /// Size of the node block (not validated)
    pub node_block_size: i32,

    /// Unused
    pub reserved: i32,

    /// Size of a single node record (not validated)
    pub node_entry_size: i32,

    /// Absolute offset of the string block
    pub string_block_offset: i32,

    /// Allocated size of the string block
    pub string_block_size: i32,

    /// Bytes of the string block actually in use (not validated)
    pub string_block_used_size: i32,

    /// Absolute offset of the data block
    pub data_block_offset: i32,
}

impl UtfHeader {
    /// Create a header with the supported tag and version and zeroed layout
    pub fn new() -> Self {
        Self {
            signature: UTF_SIGNATURE,
            version: UTF_VERSION,
            node_block_offset: 0,
            node_block_size: 0,
            reserved: 0,
            node_entry_size: 0,
            string_block_offset: 0,
            string_block_size: 0,
            string_block_used_size: 0,
            data_block_offset: 0,
        }
    }

    /// Validate the tag and version, then decode the remaining fields.
    ///
    /// Inputs that cannot hold the tag and version fail with `TooShort`.
    /// Recognized inputs that stop before the end of the header fail with
    /// `OutOfBounds`.
    pub fn parse(data: &[u8]) -> UtfResult<Self> {
        if data.len() < MIN_HEADER_SIZE {
            return Err(UtfError::TooShort { len: data.len() });
        }

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&data[..4]);
        if signature != UTF_SIGNATURE {
            return Err(UtfError::UnrecognizedFormat(signature));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&data[4..MIN_HEADER_SIZE]);
        let version = u32::from_le_bytes(version);
        if version != UTF_VERSION {
            return Err(UtfError::UnsupportedVersion(version));
        }

        if data.len() < HEADER_SIZE {
            return Err(UtfError::OutOfBounds {
                region: "header",
                offset: 0,
                len: HEADER_SIZE as i64,
            });
        }

        let header = Self::read(&mut Cursor::new(&data[..HEADER_SIZE]))?;
        Ok(header)
    }
}

impl Default for UtfHeader {
    fn default() -> Self {
        Self::new()
    }
}
