//! Command-line configuration.
//!
//! Options can be given as CLI arguments or through environment variables
//! (`LANCER_MAX_DEPTH`, `LANCER_LENIENT_SIZES`); arguments win.
//!
//! # Example
//!
//! ```
//! use lancer_cli::{CliConfig, Command};
//! use clap::Parser;
//!
//! let config = CliConfig::try_parse_from(["lancer", "tree", "ship.cmp", "--max-depth", "32"])
//!     .expect("valid arguments");
//! config.validate().expect("valid configuration");
//! assert_eq!(config.decode_options().max_depth, 32);
//! assert!(matches!(config.command, Command::Tree { .. }));
//! ```

use clap::{Parser, Subcommand};
use lancer_utf::{DEFAULT_MAX_DEPTH, DecodeOptions};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Inspector configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lancer",
    about = "Inspect UTF resource containers (.cmp, .3db, .mat, .txm, .ale)",
    version
)]
pub struct CliConfig {
    /// Maximum node nesting accepted while decoding
    #[arg(
        long,
        global = true,
        env = "LANCER_MAX_DEPTH",
        default_value_t = DEFAULT_MAX_DEPTH
    )]
    pub max_depth: usize,

    /// Accept leaves whose two size fields disagree instead of failing
    #[arg(long, global = true, env = "LANCER_LENIENT_SIZES")]
    pub lenient_sizes: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Inspector commands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the node tree
    Tree {
        /// Container to read
        file: PathBuf,

        /// Show payload sizes of leaf nodes
        #[arg(long)]
        sizes: bool,
    },

    /// Print the node tree as JSON with hex-encoded payloads
    Json {
        /// Container to read
        file: PathBuf,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Write the payload of one leaf node
    Extract {
        /// Container to read
        file: PathBuf,

        /// Backslash-separated node path, e.g. `\Cmpnd\Root\File name`
        node: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Container named by the selected command
    pub fn file(&self) -> &PathBuf {
        match &self.command {
            Command::Tree { file, .. }
            | Command::Json { file, .. }
            | Command::Extract { file, .. } => file,
        }
    }

    /// Decode options derived from the global flags
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::new()
            .with_max_depth(self.max_depth)
            .with_strict_sizes(!self.lenient_sizes)
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `max_depth` is zero
    /// - an extract path is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max-depth",
                reason: "must be at least 1".to_string(),
            });
        }

        if let Command::Extract { node, .. } = &self.command {
            if node.trim_matches('\\').is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "node",
                    reason: "extract needs a leaf path".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let config =
            CliConfig::try_parse_from(["lancer", "json", "a.mat", "--lenient-sizes", "--pretty"])
                .unwrap();
        assert!(config.lenient_sizes);
        assert!(!config.decode_options().strict_sizes);
        assert_eq!(config.file(), &PathBuf::from("a.mat"));
        assert!(matches!(config.command, Command::Json { pretty: true, .. }));
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config =
            CliConfig::try_parse_from(["lancer", "--max-depth", "0", "tree", "a.cmp"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "max-depth",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_extract_path() {
        let config = CliConfig::try_parse_from(["lancer", "extract", "a.cmp", "\\"]).unwrap();
        assert!(config.validate().is_err());

        let config = CliConfig::try_parse_from([
            "lancer",
            "extract",
            "a.cmp",
            "\\Cmpnd\\Root\\File name",
            "-o",
            "out.bin",
        ])
        .unwrap();
        config.validate().unwrap();
    }
}
