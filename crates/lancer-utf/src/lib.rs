//! Reader and builder for the UTF resource container format
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! UTF containers hold the models, materials and animations of the game as
//! a tree of named nodes. Intermediate nodes group children; leaf nodes
//! carry a raw payload. On disk the tree is spread over three blocks
//! addressed by relative offsets:
//!
//! - **Node block**: fixed-size records linked by `peer_offset` (next
//!   sibling) and `child_offset` (first child, or payload offset for leaves)
//! - **String block**: NUL-terminated node names
//! - **Data block**: leaf payloads
//!
//! # Reading
//!
//! ```no_run
//! use lancer_utf::{DecodeOptions, read_file_with_options};
//!
//! let tree = read_file_with_options("ship.cmp", DecodeOptions::new().with_max_depth(64))?;
//! if let Some(id) = tree.find("\\Cmpnd\\Root\\File name") {
//!     let node = tree.get(id).expect("handle from find");
//!     println!("{} = {:?}", node.name(), node.data());
//! }
//! # Ok::<(), lancer_utf::UtfError>(())
//! ```
//!
//! # Building
//!
//! ```
//! use lancer_utf::{UtfBuilder, UtfReader};
//!
//! let mut builder = UtfBuilder::new();
//! let root = builder.add_intermediate(None, "\\")?;
//! builder.add_leaf(Some(root), "Cargo", vec![1u8, 2, 3])?;
//! let bytes = builder.build()?;
//!
//! let tree = UtfReader::new(&bytes).read()?;
//! assert_eq!(tree.len(), 2);
//! # Ok::<(), lancer_utf::UtfError>(())
//! ```
//!
//! Decoding never trusts the offsets: every read is bounds-checked, every
//! record may be visited only once, nesting is bounded, and a
//! [`CancelFlag`] can stop a decode between records.

#![warn(missing_docs)]

mod builder;
mod error;
mod header;
mod node_tree;
mod options;
mod reader;
mod record;
mod strings;
mod tree;
mod utils;

pub use builder::UtfBuilder;
pub use error::{UtfError, UtfResult};
pub use header::{
    DEFAULT_NODE_BLOCK_OFFSET, HEADER_SIZE, MIN_HEADER_SIZE, UTF_SIGNATURE, UTF_VERSION, UtfHeader,
};
pub use node_tree::NodeTreeBuilder;
pub use options::{CancelFlag, DEFAULT_MAX_DEPTH, DecodeOptions};
pub use reader::{UtfReader, read_file, read_file_with_options};
pub use record::{NODE_RECORD_SIZE, NodeFlags, NodeRecord};
pub use strings::StringTable;
pub use tree::{NodeId, PATH_SEPARATOR, PreOrder, UtfNode, UtfTree};

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;
