//! Migrates GOPATH-mode Go projects (`dep`, `godep` or plain vendoring) to Go modules.

pub mod cli;
pub mod config;
pub mod error;
pub mod migrate;
pub mod utils;

pub use error::{CleanupWarning, ConfigError, Error, Result};
pub use migrate::{GoModMigrator, ProjectDir, Toolchain, is_legacy_mode};
