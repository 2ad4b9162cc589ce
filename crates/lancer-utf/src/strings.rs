//! String table lookups

use crate::error::{UtfError, UtfResult};

/// Borrowed view of the string block: NUL-terminated ASCII names addressed
/// by byte offset from the start of the block
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    bytes: &'a [u8],
}

impl<'a> StringTable<'a> {
    /// Wrap the raw string block
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Size of the table in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the table has no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Resolve the name starting at `offset`, excluding its terminator.
    ///
    /// Bytes outside the ASCII range decode as `?`.
    pub fn resolve(&self, offset: i32) -> UtfResult<String> {
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start < self.bytes.len())
            .ok_or(UtfError::OutOfBounds {
                region: "string table",
                offset: i64::from(offset),
                len: 1,
            })?;

        let tail = &self.bytes[start..];
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(UtfError::MalformedString { offset })?;

        Ok(tail[..end]
            .iter()
            .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
            .collect())
    }
}
