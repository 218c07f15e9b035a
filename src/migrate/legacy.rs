use std::fs;
use std::io;

use tracing::{info, warn};

use super::GoModMigrator;
use crate::error::CleanupWarning;

/// Files and directories left behind by `dep` and `godep`.
pub const LEGACY_ARTIFACTS: &[&str] = &["Gopkg.lock", "Gopkg.toml", "Godeps"];

impl GoModMigrator {
    /// Deletes [`LEGACY_ARTIFACTS`] from the project root.
    ///
    /// Removal failures do not undo a successful migration; they are logged
    /// and handed back to the caller.
    pub fn remove_legacy_artifacts(&self) -> Vec<CleanupWarning> {
        let mut warnings = Vec::new();
        for name in LEGACY_ARTIFACTS {
            let path = self.project_dir().join(name);
            let result = match fs::symlink_metadata(&path) {
                Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
                Ok(_) => fs::remove_file(&path),
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => info!("Removed {name}"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    let warning = CleanupWarning { path, source };
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }
        warnings
    }
}
