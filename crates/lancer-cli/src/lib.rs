//! UTF container inspector.
//!
//! This crate backs the `lancer` binary:
//! - `config`: CLI argument and environment parsing
//! - `commands`: tree, JSON and extract commands
//! - `error`: configuration and command errors
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use lancer_cli::{CliConfig, run};
//!
//! let config = CliConfig::parse_from(["lancer", "tree", "ship.cmp", "--sizes"]);
//! run(&config, &mut std::io::stdout().lock())?;
//! # Ok::<(), lancer_cli::CommandError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod config;
pub mod error;

pub use commands::{JsonNode, leaf_data, run, write_json, write_tree};
pub use config::{CliConfig, Command};
pub use error::{CommandError, ConfigError};
