//! Container reader: header validation and block location

use std::path::Path;

use crate::error::UtfResult;
use crate::header::UtfHeader;
use crate::node_tree::NodeTreeBuilder;
use crate::options::DecodeOptions;
use crate::strings::StringTable;
use crate::tree::UtfTree;
use crate::utils::slice_at;

/// Reads a UTF container held in memory
#[derive(Debug, Clone)]
pub struct UtfReader<'a> {
    data: &'a [u8],
    options: DecodeOptions,
}

impl<'a> UtfReader<'a> {
    /// Create a reader with default options
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, DecodeOptions::default())
    }

    /// Create a reader with custom options
    pub fn with_options(data: &'a [u8], options: DecodeOptions) -> Self {
        Self { data, options }
    }

    /// Validate and decode the header
    pub fn header(&self) -> UtfResult<UtfHeader> {
        UtfHeader::parse(self.data)
    }

    /// Borrow the string block described by `header`
    pub fn string_table(&self, header: &UtfHeader) -> UtfResult<StringTable<'a>> {
        let bytes = slice_at(
            self.data,
            "string block",
            0,
            i64::from(header.string_block_offset),
            i64::from(header.string_block_size),
        )?;
        Ok(StringTable::new(bytes))
    }

    /// Decode the whole container into a tree
    pub fn read(&self) -> UtfResult<UtfTree> {
        let header = self.header()?;
        tracing::debug!(
            node_block = header.node_block_offset,
            string_block = header.string_block_offset,
            string_block_size = header.string_block_size,
            data_block = header.data_block_offset,
            "UTF header"
        );

        let strings = self.string_table(&header)?;
        NodeTreeBuilder::new(
            self.data,
            strings,
            header.node_block_offset,
            header.data_block_offset,
            &self.options,
        )
        .build()
    }
}

/// Read the container at `path` with default options
pub fn read_file(path: impl AsRef<Path>) -> UtfResult<UtfTree> {
    read_file_with_options(path, DecodeOptions::default())
}

/// Read the container at `path`.
///
/// The file is loaded in a single read and closed before decoding starts.
pub fn read_file_with_options(
    path: impl AsRef<Path>,
    options: DecodeOptions,
) -> UtfResult<UtfTree> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), len = data.len(), "loaded UTF container");
    UtfReader::with_options(&data, options).read()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::UtfBuilder;
    use crate::error::UtfError;
    use crate::header::HEADER_SIZE;
    use pretty_assertions::assert_eq;

    fn two_leaves() -> Vec<u8> {
        let mut builder = UtfBuilder::new();
        builder.add_leaf(None, "A", vec![1u8, 2, 3]).unwrap();
        builder.add_leaf(None, "B", vec![4u8, 5]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_read_in_memory() {
        let bytes = two_leaves();
        let tree = UtfReader::new(&bytes).read().unwrap();

        let roots: Vec<(&str, Option<&[u8]>)> = tree
            .roots()
            .iter()
            .map(|&id| {
                let node = tree.get(id).unwrap();
                (node.name(), node.data())
            })
            .collect();
        assert_eq!(
            roots,
            vec![("A", Some(&[1u8, 2, 3][..])), ("B", Some(&[4u8, 5][..]))]
        );
    }

    #[test]
    fn test_string_block_out_of_bounds() {
        let mut bytes = two_leaves();
        // string_block_size lives at bytes 28..32
        bytes[28..32].copy_from_slice(&0x7FFF_0000i32.to_le_bytes());

        let err = UtfReader::new(&bytes).read().unwrap_err();
        assert!(matches!(err, UtfError::OutOfBounds { region: "string block", .. }));
    }

    #[test]
    fn test_negative_node_block_offset() {
        let mut bytes = two_leaves();
        bytes[8..12].copy_from_slice(&(-4i32).to_le_bytes());

        let err = UtfReader::new(&bytes).read().unwrap_err();
        assert!(matches!(err, UtfError::OutOfBounds { region: "node record", .. }));
    }

    #[test]
    fn test_header_only_container() {
        let bytes = two_leaves();
        let err = UtfReader::new(&bytes[..HEADER_SIZE]).read().unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_read_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(dir.path().join("missing.utf")).unwrap_err();
        assert!(matches!(err, UtfError::Io(_)));
    }
}
