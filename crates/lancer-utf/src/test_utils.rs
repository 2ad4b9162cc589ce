//! Hand-assembled node tables for decoder tests
//!
//! Unlike [`crate::UtfBuilder`], these fixtures place records exactly as the
//! test writes them, so tests can express arbitrary (and broken) offset
//! chains.

use binrw::BinWrite;
use std::io::Cursor;

use crate::record::{NODE_RECORD_SIZE, NodeRecord};

/// Node records, string block and data block assembled by hand
#[derive(Debug, Default)]
pub struct NodeTableFixture {
    /// String block contents
    pub strings: Vec<u8>,
    /// Records in table order
    pub records: Vec<NodeRecord>,
    /// Data block contents
    pub payloads: Vec<u8>,
}

impl NodeTableFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a NUL-terminated name, returning its string table offset
    pub fn name(&mut self, name: &str) -> i32 {
        let offset = self.strings.len() as i32;
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);
        offset
    }

    /// Append a payload, returning its data block offset
    pub fn payload(&mut self, bytes: &[u8]) -> i32 {
        let offset = self.payloads.len() as i32;
        self.payloads.extend_from_slice(bytes);
        offset
    }

    /// Append a record; the n-th record lives at node offset `n * 44`
    pub fn record(&mut self, record: NodeRecord) {
        self.records.push(record);
    }

    /// Offset of the data block when the node block starts at zero
    pub fn data_block_offset(&self) -> i32 {
        (self.records.len() * NODE_RECORD_SIZE) as i32
    }

    /// Node block followed by the data block
    pub fn body(&self) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        for record in &self.records {
            record
                .write(&mut cursor)
                .expect("record should serialize");
        }
        let mut body = cursor.into_inner();
        body.extend_from_slice(&self.payloads);
        body
    }
}
