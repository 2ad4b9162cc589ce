//! Node table decoding
//!
//! Records are linked by two relative offsets: `child_offset` descends one
//! level and `peer_offset` moves to the next sibling at the same level. The
//! walk below keeps pending records on an explicit stack instead of
//! recursing, and refuses to visit any record twice, so corrupt offset
//! chains fail with an error rather than looping or exhausting the stack.

use binrw::BinRead;
use std::collections::HashSet;
use std::io::Cursor;

use crate::error::{UtfError, UtfResult};
use crate::options::DecodeOptions;
use crate::record::{NODE_RECORD_SIZE, NodeRecord};
use crate::strings::StringTable;
use crate::tree::{NodeId, UtfNode, UtfTree};
use crate::utils::slice_at;

/// A record still to be decoded, with the node it will be attached to
#[derive(Debug, Clone, Copy)]
struct Pending {
    node_offset: i32,
    parent: Option<NodeId>,
    depth: usize,
}

/// Builds a [`UtfTree`] from the node block of a container
#[derive(Debug)]
pub struct NodeTreeBuilder<'a> {
    data: &'a [u8],
    strings: StringTable<'a>,
    node_block_offset: i64,
    data_block_offset: i64,
    options: &'a DecodeOptions,
    tree: UtfTree,
    visited: HashSet<i32>,
}

impl<'a> NodeTreeBuilder<'a> {
    /// Create a builder over the whole container `data`.
    ///
    /// Node offsets are relative to `node_block_offset` and leaf payload
    /// offsets to `data_block_offset`; both are absolute positions in `data`.
    pub fn new(
        data: &'a [u8],
        strings: StringTable<'a>,
        node_block_offset: i32,
        data_block_offset: i32,
        options: &'a DecodeOptions,
    ) -> Self {
        Self {
            data,
            strings,
            node_block_offset: i64::from(node_block_offset),
            data_block_offset: i64::from(data_block_offset),
            options,
            tree: UtfTree::new(),
            visited: HashSet::new(),
        }
    }

    /// Decode the whole node table starting at the first record
    pub fn build(mut self) -> UtfResult<UtfTree> {
        self.parse(0, None)?;
        tracing::debug!(
            nodes = self.tree.len(),
            leaves = self.tree.leaf_count(),
            "decoded node table"
        );
        Ok(self.tree)
    }

    /// Decode the record at `node_offset`, its subtree, and every peer that
    /// follows it, appending them to `parent` (or to the top level).
    ///
    /// A node's subtree is fully expanded before its next peer, so children
    /// end up in peer-chain order.
    pub fn parse(&mut self, node_offset: i32, parent: Option<NodeId>) -> UtfResult<()> {
        let depth = match parent {
            Some(id) => self.depth_of(id)? + 1,
            None => 0,
        };

        let mut stack = vec![Pending {
            node_offset,
            parent,
            depth,
        }];

        while let Some(pending) = stack.pop() {
            if self.options.is_cancelled() {
                return Err(UtfError::Cancelled);
            }
            if pending.depth >= self.options.max_depth {
                return Err(UtfError::DepthLimitExceeded {
                    depth: self.options.max_depth,
                });
            }
            if !self.visited.insert(pending.node_offset) {
                return Err(UtfError::CyclicOffset(pending.node_offset));
            }

            let record = self.read_record(pending.node_offset)?;
            if record.flags.is_leaf() && record.flags.is_intermediate() {
                return Err(UtfError::InvalidFlags {
                    offset: pending.node_offset,
                    flags: record.flags.value,
                });
            }

            let name = self.strings.resolve(record.name_offset)?;
            tracing::trace!(
                offset = pending.node_offset,
                name = %name,
                flags = %record.flags,
                "node record"
            );

            let mut node = UtfNode::new(name, record.flags, pending.parent);
            if record.flags.is_leaf() {
                node.data = Some(self.read_payload(&record, &node.name)?.to_vec());
            }
            let id = self.tree.push(node);

            // Peer goes below the child so the subtree is finished first.
            if record.peer_offset > 0 {
                stack.push(Pending {
                    node_offset: record.peer_offset,
                    ..pending
                });
            }
            if record.flags.is_intermediate() && record.child_offset > 0 {
                stack.push(Pending {
                    node_offset: record.child_offset,
                    parent: Some(id),
                    depth: pending.depth + 1,
                });
            }
        }

        Ok(())
    }

    /// Read the record at `node_offset` within the node block
    pub fn read_record(&self, node_offset: i32) -> UtfResult<NodeRecord> {
        let bytes = slice_at(
            self.data,
            "node record",
            self.node_block_offset,
            i64::from(node_offset),
            NODE_RECORD_SIZE as i64,
        )?;
        Ok(NodeRecord::read(&mut Cursor::new(bytes))?)
    }

    fn read_payload(&self, record: &NodeRecord, name: &str) -> UtfResult<&'a [u8]> {
        if record.has_size_mismatch() {
            if self.options.strict_sizes {
                return Err(UtfError::SizeMismatch {
                    name: name.to_string(),
                    size: record.size,
                    size2: record.size2,
                });
            }
            tracing::warn!(
                name,
                size = record.size,
                size2 = record.size2,
                "leaf size fields disagree, reading allocated size as raw bytes"
            );
        }

        // Empty payloads are never read, wherever they claim to start.
        if record.allocated_size == 0 && record.child_offset >= 0 {
            return Ok(&[]);
        }

        slice_at(
            self.data,
            "leaf data",
            self.data_block_offset,
            i64::from(record.child_offset),
            i64::from(record.allocated_size),
        )
    }

    fn depth_of(&self, id: NodeId) -> UtfResult<usize> {
        let mut node = self.tree.get(id).ok_or(UtfError::UnknownNode(id.index()))?;
        let mut depth = 0;
        while let Some(parent) = node.parent() {
            depth += 1;
            node = self
                .tree
                .get(parent)
                .ok_or(UtfError::UnknownNode(parent.index()))?;
        }
        Ok(depth)
    }
}
