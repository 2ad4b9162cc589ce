//! Node records and flags

use binrw::{BinRead, BinWrite};
use std::fmt;

/// Size of a node record in bytes
pub const NODE_RECORD_SIZE: usize = 44;

/// Node flags distinguish leaf and intermediate records
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Raw flag value
    pub value: u32,
}

impl NodeFlags {
    /// Record groups child records (bit 4)
    pub const INTERMEDIATE: u32 = 0x10;

    /// Record carries a payload in the data block (bit 7)
    pub const LEAF: u32 = 0x80;

    /// Create flags from a raw value
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    /// Flags for an intermediate record
    pub const fn intermediate() -> Self {
        Self::new(Self::INTERMEDIATE)
    }

    /// Flags for a leaf record
    pub const fn leaf() -> Self {
        Self::new(Self::LEAF)
    }

    /// Check if flag is set
    pub const fn has(&self, flag: u32) -> bool {
        (self.value & flag) != 0
    }

    /// Leaf bit is set
    pub const fn is_leaf(&self) -> bool {
        self.has(Self::LEAF)
    }

    /// Intermediate bit is set
    pub const fn is_intermediate(&self) -> bool {
        self.has(Self::INTERMEDIATE)
    }
}

impl fmt::Display for NodeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match (self.is_leaf(), self.is_intermediate()) {
            (true, false) => "leaf",
            (false, true) => "intermediate",
            (true, true) => "invalid",
            (false, false) => "none",
        };
        write!(f, "{kind} (0x{:08X})", self.value)
    }
}

/// Node record as stored in the node block
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct NodeRecord {
    /// Offset of the next sibling record; zero or negative ends the chain
    pub peer_offset: i32,

    /// Offset of the name in the string table
    pub name_offset: i32,

    /// Leaf or intermediate flags
    pub flags: NodeFlags,

    /// Always zero in practice
    pub reserved: i32,

    /// First child record (intermediate) or payload offset in the data block (leaf)
    pub child_offset: i32,

    /// Payload bytes allocated in the data block
    pub allocated_size: i32,

    /// Stored payload size
    pub size: i32,

    /// Uncompressed payload size
    pub size2: i32,

    /// Creation, access and modification times
    pub timestamps: [u32; 3],
}

impl NodeRecord {
    /// Create an intermediate record
    pub fn intermediate(name_offset: i32, peer_offset: i32, child_offset: i32) -> Self {
        Self {
            peer_offset,
            name_offset,
            flags: NodeFlags::intermediate(),
            reserved: 0,
            child_offset,
            allocated_size: 0,
            size: 0,
            size2: 0,
            timestamps: [0; 3],
        }
    }

    /// Create a leaf record whose size fields all equal `size`
    pub fn leaf(name_offset: i32, peer_offset: i32, data_offset: i32, size: i32) -> Self {
        Self {
            peer_offset,
            name_offset,
            flags: NodeFlags::leaf(),
            reserved: 0,
            child_offset: data_offset,
            allocated_size: size,
            size,
            size2: size,
            timestamps: [0; 3],
        }
    }

    /// Whether the redundant size fields disagree.
    ///
    /// A mismatch suggests the payload uses an encoding other than raw bytes.
    pub fn has_size_mismatch(&self) -> bool {
        self.size != self.size2
    }
}
