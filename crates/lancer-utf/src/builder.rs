//! UTF container builder
//!
//! Writes trees in the same layout the game tools produce: header, node
//! block in pre-order, string block, data block. Names are stored once in
//! the string block and every payload starts on a 4-byte boundary.

use binrw::BinWrite;
use std::collections::HashMap;
use std::io::{Cursor, Write};

use crate::error::{UtfError, UtfResult};
use crate::header::{DEFAULT_NODE_BLOCK_OFFSET, HEADER_SIZE, UtfHeader};
use crate::record::{NODE_RECORD_SIZE, NodeRecord};
use crate::tree::{NodeId, UtfTree};

#[derive(Debug, Clone)]
struct BuilderNode {
    name: String,
    data: Option<Vec<u8>>,
    children: Vec<NodeId>,
}

/// Builder for creating UTF containers
#[derive(Debug, Clone, Default)]
pub struct UtfBuilder {
    nodes: Vec<BuilderNode>,
    roots: Vec<NodeId>,
}

impl UtfBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every node of a decoded tree, preserving order
    pub fn from_tree(tree: &UtfTree) -> Self {
        let mut builder = Self::new();
        let mut mapped = vec![None; tree.len()];

        for (id, node) in tree {
            let parent = node.parent().and_then(|p| mapped[p.index()]);
            let new_id = builder.push(
                parent,
                node.name().to_string(),
                node.data().map(<[u8]>::to_vec),
            );
            mapped[id.index()] = Some(new_id);
        }

        builder
    }

    /// Number of nodes added so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes were added
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an intermediate node under `parent`, or at the top level
    pub fn add_intermediate(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
    ) -> UtfResult<NodeId> {
        self.add(parent, name.into(), None)
    }

    /// Add a leaf node carrying `data` under `parent`, or at the top level
    pub fn add_leaf(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> UtfResult<NodeId> {
        self.add(parent, name.into(), Some(data.into()))
    }

    fn add(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        data: Option<Vec<u8>>,
    ) -> UtfResult<NodeId> {
        if !name.is_ascii() || name.contains('\0') {
            return Err(UtfError::InvalidName(name));
        }
        if let Some(parent) = parent {
            let node = self
                .nodes
                .get(parent.index())
                .ok_or(UtfError::UnknownNode(parent.index()))?;
            if node.data.is_some() {
                return Err(UtfError::NotIntermediate(node.name.clone()));
            }
        }
        Ok(self.push(parent, name, data))
    }

    fn push(&mut self, parent: Option<NodeId>, name: String, data: Option<Vec<u8>>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(BuilderNode {
            name,
            data,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.index()].children.iter().rev().copied());
        }
        order
    }

    /// Serialize the tree into a container
    pub fn build(&self) -> UtfResult<Vec<u8>> {
        if self.roots.is_empty() {
            return Err(UtfError::EmptyTree);
        }

        let order = self.pre_order();
        let mut record_offset = vec![0i32; self.nodes.len()];
        for (index, id) in order.iter().enumerate() {
            record_offset[id.index()] = to_offset(index * NODE_RECORD_SIZE)?;
        }

        let mut next_peer = vec![None; self.nodes.len()];
        let sibling_lists =
            std::iter::once(&self.roots).chain(self.nodes.iter().map(|node| &node.children));
        for siblings in sibling_lists {
            for pair in siblings.windows(2) {
                next_peer[pair[0].index()] = Some(pair[1]);
            }
        }

        let mut strings = Vec::new();
        let mut name_offsets: HashMap<&str, i32> = HashMap::new();
        let mut blob = Vec::new();
        let mut records = Vec::with_capacity(order.len());

        for id in &order {
            let node = &self.nodes[id.index()];

            let name_offset = if let Some(&offset) = name_offsets.get(node.name.as_str()) {
                offset
            } else {
                let offset = to_offset(strings.len())?;
                strings.extend_from_slice(node.name.as_bytes());
                strings.push(0);
                name_offsets.insert(node.name.as_str(), offset);
                offset
            };

            let peer_offset = next_peer[id.index()].map_or(0, |p: NodeId| record_offset[p.index()]);

            let record = match &node.data {
                Some(data) => {
                    let data_offset = to_offset(blob.len())?;
                    blob.extend_from_slice(data);
                    pad_to_4(&mut blob);
                    NodeRecord::leaf(name_offset, peer_offset, data_offset, to_offset(data.len())?)
                }
                None => {
                    let child_offset = node
                        .children
                        .first()
                        .map_or(0, |c| record_offset[c.index()]);
                    NodeRecord::intermediate(name_offset, peer_offset, child_offset)
                }
            };
            records.push(record);
        }

        let strings_used = strings.len();
        pad_to_4(&mut strings);

        let node_block_size = records.len() * NODE_RECORD_SIZE;
        let string_block_offset = DEFAULT_NODE_BLOCK_OFFSET + node_block_size;
        let data_block_offset = string_block_offset + strings.len();
        let total = data_block_offset + blob.len();
        to_offset(total)?;

        let header = UtfHeader {
            node_block_offset: to_offset(DEFAULT_NODE_BLOCK_OFFSET)?,
            node_block_size: to_offset(node_block_size)?,
            node_entry_size: NODE_RECORD_SIZE as i32,
            string_block_offset: to_offset(string_block_offset)?,
            string_block_size: to_offset(strings.len())?,
            string_block_used_size: to_offset(strings_used)?,
            data_block_offset: to_offset(data_block_offset)?,
            ..UtfHeader::new()
        };

        let mut cursor = Cursor::new(Vec::with_capacity(total));
        header.write(&mut cursor)?;
        cursor.write_all(&[0u8; DEFAULT_NODE_BLOCK_OFFSET - HEADER_SIZE])?;
        for record in &records {
            record.write(&mut cursor)?;
        }
        cursor.write_all(&strings)?;
        cursor.write_all(&blob)?;

        tracing::debug!(
            nodes = records.len(),
            string_bytes = strings.len(),
            data_bytes = blob.len(),
            "built UTF container"
        );
        Ok(cursor.into_inner())
    }
}

fn to_offset(value: usize) -> UtfResult<i32> {
    i32::try_from(value).map_err(|_| UtfError::LayoutOverflow(value))
}

fn pad_to_4(buf: &mut Vec<u8>) {
    buf.resize(buf.len().next_multiple_of(4), 0);
}
