//! UTF container error types

use thiserror::Error;

/// Errors that can occur when reading or building UTF containers
#[derive(Debug, Error)]
pub enum UtfError {
    /// Input is smaller than the tag and version fields
    #[error("container too short: {len} bytes, need at least 8")]
    TooShort {
        /// Length of the input in bytes
        len: usize,
    },

    /// Tag bytes are not `UTF `
    #[error("unrecognized container tag: {0:?}")]
    UnrecognizedFormat([u8; 4]),

    /// Version field is not the supported version
    #[error("unsupported UTF version: 0x{0:X}")]
    UnsupportedVersion(u32),

    /// Name offset has no NUL terminator inside the string table
    #[error("unterminated string at string table offset {offset}")]
    MalformedString {
        /// Offset into the string table
        offset: i32,
    },

    /// An offset or length points outside the input
    #[error("{region} out of bounds: offset {offset}, length {len}")]
    OutOfBounds {
        /// Which part of the container was being read
        region: &'static str,
        /// Absolute or block-relative offset that was requested
        offset: i64,
        /// Number of bytes that were requested
        len: i64,
    },

    /// A node record was reached twice while walking the offset chains
    #[error("node record at offset {0} is referenced more than once")]
    CyclicOffset(i32),

    /// Node nesting exceeds the configured limit
    #[error("node nesting exceeds maximum depth of {depth}")]
    DepthLimitExceeded {
        /// Configured maximum depth
        depth: usize,
    },

    /// Node flags mark a record as both leaf and intermediate
    #[error("invalid node flags 0x{flags:08X} at node offset {offset}")]
    InvalidFlags {
        /// Node offset within the node table
        offset: i32,
        /// Raw flag value
        flags: u32,
    },

    /// Leaf size fields disagree, which indicates an unsupported payload encoding
    #[error("leaf '{name}' has mismatched sizes: size={size}, size2={size2}")]
    SizeMismatch {
        /// Leaf name
        name: String,
        /// Stored size
        size: i32,
        /// Second size field
        size2: i32,
    },

    /// Decoding was cancelled through a [`crate::CancelFlag`]
    #[error("decode cancelled")]
    Cancelled,

    /// Builder has no nodes to write
    #[error("cannot build a container without nodes")]
    EmptyTree,

    /// Node handle does not belong to this builder
    #[error("unknown node handle: {0}")]
    UnknownNode(usize),

    /// Children can only be added to intermediate nodes
    #[error("node '{0}' is not an intermediate node")]
    NotIntermediate(String),

    /// Node names cannot contain NUL bytes
    #[error("invalid node name: {0:?}")]
    InvalidName(String),

    /// Built container does not fit 32-bit signed offsets
    #[error("container layout overflow: {0} bytes")]
    LayoutOverflow(usize),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl UtfError {
    /// Whether the input was rejected by the header checks
    ///
    /// These inputs are not UTF containers at all (or a version this
    /// crate does not understand), as opposed to damaged ones.
    pub fn is_unparseable(&self) -> bool {
        matches!(
            self,
            Self::TooShort { .. } | Self::UnrecognizedFormat(_) | Self::UnsupportedVersion(_)
        )
    }

    /// Whether the input passed the header checks but its body is damaged
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedString { .. }
                | Self::OutOfBounds { .. }
                | Self::CyclicOffset(_)
                | Self::DepthLimitExceeded { .. }
                | Self::InvalidFlags { .. }
                | Self::SizeMismatch { .. }
                | Self::BinRw(_)
        )
    }
}

/// Result type for UTF operations
pub type UtfResult<T> = Result<T, UtfError>;
