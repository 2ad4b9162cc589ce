//! Inspector commands.
//!
//! Every command writes to a caller-supplied writer so the binary can use
//! stdout while tests capture the output.

use lancer_utf::{DecodeOptions, NodeId, UtfTree, read_file_with_options};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::config::{CliConfig, Command};
use crate::error::CommandError;

/// Run the configured command, writing its output to `out`.
pub fn run<W: Write>(config: &CliConfig, out: &mut W) -> Result<(), CommandError> {
    config.validate()?;
    let tree = load(config.file(), config.decode_options())?;

    match &config.command {
        Command::Tree { sizes, .. } => write_tree(&tree, *sizes, out)?,
        Command::Json { pretty, .. } => write_json(&tree, *pretty, out)?,
        Command::Extract { node, output, .. } => {
            let data = leaf_data(&tree, node)?;
            match output {
                Some(path) => {
                    std::fs::write(path, data)?;
                    tracing::info!("Wrote {} bytes to {}", data.len(), path.display());
                }
                None => out.write_all(data)?,
            }
        }
    }

    Ok(())
}

fn load(path: &Path, options: DecodeOptions) -> Result<UtfTree, CommandError> {
    tracing::debug!("Reading {}", path.display());
    let tree = read_file_with_options(path, options).map_err(|source| CommandError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        "Decoded {} nodes ({} leaves) from {}",
        tree.len(),
        tree.leaf_count(),
        path.display()
    );
    Ok(tree)
}

/// Payload of the leaf at `path`
pub fn leaf_data<'a>(tree: &'a UtfTree, path: &str) -> Result<&'a [u8], CommandError> {
    let node = tree
        .find(path)
        .and_then(|id| tree.get(id))
        .ok_or_else(|| CommandError::NodeNotFound(path.to_string()))?;
    node.data()
        .ok_or_else(|| CommandError::NotALeaf(path.to_string()))
}

/// Print one line per node, indented by depth. Intermediate nodes end in `\`.
pub fn write_tree<W: Write>(tree: &UtfTree, sizes: bool, out: &mut W) -> std::io::Result<()> {
    let mut stack: Vec<(NodeId, usize)> = tree.roots().iter().rev().map(|&id| (id, 0)).collect();

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let indent = "  ".repeat(depth);

        match node.data() {
            Some(data) if sizes => {
                writeln!(out, "{indent}{} ({} bytes)", node.name(), data.len())?;
            }
            Some(_) => writeln!(out, "{indent}{}", node.name())?,
            None if node.name().ends_with('\\') => writeln!(out, "{indent}{}", node.name())?,
            None => writeln!(out, "{indent}{}\\", node.name())?,
        }

        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }

    Ok(())
}

/// JSON view of a node and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonNode {
    /// Node name
    pub name: String,
    /// `leaf`, `intermediate`, or `none` when no kind bit is set
    pub kind: &'static str,
    /// Payload length for leaves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Hex-encoded payload for leaves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Children in file order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode>,
}

impl JsonNode {
    /// Convert the subtree rooted at `id`
    pub fn from_node(tree: &UtfTree, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        Some(Self {
            name: node.name().to_string(),
            kind: match (node.is_leaf(), node.is_intermediate()) {
                (true, _) => "leaf",
                (false, true) => "intermediate",
                (false, false) => "none",
            },
            size: node.data().map(<[u8]>::len),
            data: node.data().map(hex::encode),
            children: node
                .children()
                .iter()
                .filter_map(|&child| Self::from_node(tree, child))
                .collect(),
        })
    }

    /// Convert every top-level node
    pub fn forest(tree: &UtfTree) -> Vec<Self> {
        tree.roots()
            .iter()
            .filter_map(|&id| Self::from_node(tree, id))
            .collect()
    }
}

/// Serialize the whole forest as a JSON array
pub fn write_json<W: Write>(tree: &UtfTree, pretty: bool, out: &mut W) -> Result<(), CommandError> {
    let forest = JsonNode::forest(tree);
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &forest)?;
    } else {
        serde_json::to_writer(&mut *out, &forest)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use lancer_utf::{UtfBuilder, UtfReader};
    use pretty_assertions::assert_eq;

    fn sample() -> UtfTree {
        let mut builder = UtfBuilder::new();
        let root = builder.add_intermediate(None, "\\").unwrap();
        let cmpnd = builder.add_intermediate(Some(root), "Cmpnd").unwrap();
        builder
            .add_leaf(Some(cmpnd), "Object name", b"Root\0".to_vec())
            .unwrap();
        builder.add_intermediate(Some(root), "Empty").unwrap();
        let bytes = builder.build().unwrap();
        UtfReader::new(&bytes).read().unwrap()
    }

    #[test]
    fn test_write_tree() {
        let mut out = Vec::new();
        write_tree(&sample(), true, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\\\n  Cmpnd\\\n    Object name (5 bytes)\n  Empty\\\n"
        );
    }

    #[test]
    fn test_json_node() {
        let forest = JsonNode::forest(&sample());
        assert_eq!(forest.len(), 1);
        let cmpnd = &forest[0].children[0];
        assert_eq!(cmpnd.kind, "intermediate");
        assert_eq!(
            cmpnd.children[0],
            JsonNode {
                name: "Object name".to_string(),
                kind: "leaf",
                size: Some(5),
                data: Some("526f6f7400".to_string()),
                children: Vec::new(),
            }
        );
    }

    #[test]
    fn test_json_kind_without_kind_bits() {
        let mut builder = UtfBuilder::new();
        builder.add_intermediate(None, "Odd").unwrap();
        let mut bytes = builder.build().unwrap();
        // Clear the flags of the only record.
        bytes[64..68].copy_from_slice(&0u32.to_le_bytes());

        let tree = UtfReader::new(&bytes).read().unwrap();
        let forest = JsonNode::forest(&tree);
        assert_eq!(forest[0].name, "Odd");
        assert_eq!(forest[0].kind, "none");
        assert_eq!(forest[0].size, None);
        assert_eq!(forest[0].data, None);
    }

    #[test]
    fn test_leaf_data_errors() {
        let tree = sample();
        assert_eq!(leaf_data(&tree, "\\Cmpnd\\Object name").unwrap(), b"Root\0");
        assert!(matches!(
            leaf_data(&tree, "\\Cmpnd"),
            Err(CommandError::NotALeaf(_))
        ));
        assert!(matches!(
            leaf_data(&tree, "\\Missing"),
            Err(CommandError::NodeNotFound(_))
        ));
    }
}
