use tempfile::TempDir;
use tracing::{error, info};

use super::{GoModMigrator, Toolchain};
use crate::error::{Error, Result};
use crate::utils::fs::{copy_dir_contents, io_error};

impl GoModMigrator {
    /// Builds a throwaway copy of the project so build artifacts never land in it.
    ///
    /// The copy is removed whether the build passes or not.
    pub fn verify_build(&self, toolchain: &Toolchain) -> Result<()> {
        let tmp = tempfile::Builder::new()
            .prefix("modupdate-build-")
            .tempdir()
            .map_err(|source| io_error("create temp dir in", &std::env::temp_dir(), source))?;

        let outcome = self.build_copy(toolchain, &tmp);

        let tmp_path = tmp.path().to_path_buf();
        let cleanup = tmp.close().map_err(|source| Error::TempDirCleanup {
            path: tmp_path,
            source,
        });

        match (outcome, cleanup) {
            (Ok(()), Ok(())) => {
                info!("Build succeeded");
                Ok(())
            }
            (Ok(()), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(cleanup_err)) => {
                error!("{cleanup_err}");
                Err(err)
            }
        }
    }

    fn build_copy(&self, toolchain: &Toolchain, tmp: &TempDir) -> Result<()> {
        copy_dir_contents(self.project_dir(), tmp.path())?;
        let output = toolchain.step(["build"], tmp.path()).run_captured()?;
        if !output.is_empty() {
            info!("{output}");
        }
        Ok(())
    }
}
