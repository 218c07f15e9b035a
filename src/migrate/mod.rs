//! Migration of GOPATH-mode Go projects to Go modules.
//!
//! [`ProjectDir`] answers whether a project still needs migrating,
//! [`GoModMigrator`] runs the `go mod` plan against it.

mod legacy;
mod verify;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Error, Result};
use crate::utils::fs::io_error;
use crate::utils::shell::CommandStep;

pub use legacy::LEGACY_ARTIFACTS;

pub const GO_MOD_FILE: &str = "go.mod";
pub const VENDOR_DIR: &str = "vendor";

/// Go binary and environment used for every command of a plan.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub binary: PathBuf,
    /// Exported as `GOROOT` so an alternate Go version can be driven.
    pub goroot: Option<PathBuf>,
    /// When false, `go mod init` may infer the module path from the directory.
    pub requires_package_name: bool,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("go"),
            goroot: None,
            requires_package_name: true,
        }
    }
}

impl Toolchain {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }

    fn step<I, S>(&self, args: I, dir: &Path) -> CommandStep
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let step = CommandStep::new(self.binary.clone(), args, dir);
        match &self.goroot {
            Some(goroot) => step.env("GOROOT", goroot.as_os_str()),
            None => step,
        }
    }
}

/// Absolute path of an existing project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDir(PathBuf);

impl ProjectDir {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).map_err(|source| Error::Path {
            path: path.to_path_buf(),
            source,
        })?;
        let metadata = fs::metadata(&absolute).map_err(|source| Error::Path {
            path: absolute.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory(absolute));
        }
        Ok(Self(absolute))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn go_mod_path(&self) -> PathBuf {
        self.0.join(GO_MOD_FILE)
    }

    /// True while the project has no `go.mod`, i.e. it still builds in GOPATH mode.
    pub fn is_legacy_mode(&self) -> bool {
        fs::metadata(self.go_mod_path()).is_err()
    }
}

pub fn is_legacy_mode(path: impl AsRef<Path>) -> Result<bool> {
    Ok(ProjectDir::new(path)?.is_legacy_mode())
}

#[derive(Debug, Clone)]
pub struct GoModMigrator {
    project: ProjectDir,
}

impl GoModMigrator {
    pub fn new(project_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            project: ProjectDir::new(project_dir)?,
        })
    }

    pub fn project_dir(&self) -> &Path {
        self.project.path()
    }

    pub fn is_legacy_mode(&self) -> bool {
        self.project.is_legacy_mode()
    }

    /// Removes `vendor/`, then runs `go mod init`, `go mod tidy` and `go mod vendor`.
    ///
    /// Stops at the first failing command. Nothing already done is rolled
    /// back, so a failed `tidy` leaves the fresh `go.mod` in place.
    pub fn migrate(&self, toolchain: &Toolchain, package_name: &str) -> Result<()> {
        let package_name = package_name.trim();
        if package_name.is_empty() && toolchain.requires_package_name {
            return Err(ConfigError::MissingPackageName.into());
        }

        let dir = self.project_dir();
        let mut init_args = vec!["mod", "init"];
        if !package_name.is_empty() {
            init_args.push(package_name);
        }
        let steps = [
            toolchain.step(init_args, dir),
            toolchain.step(["mod", "tidy"], dir),
            toolchain.step(["mod", "vendor"], dir),
        ];

        remove_dir_if_exists(&dir.join(VENDOR_DIR))?;

        for step in &steps {
            self.log_go_mod()?;
            let output = step.run_captured()?;
            if !output.is_empty() {
                debug!("{output}");
            }
        }

        info!("Migrated {} to Go modules", dir.display());
        Ok(())
    }

    /// Upgrades every dependency (tests included) and re-vendors.
    pub fn update(&self, toolchain: &Toolchain) -> Result<()> {
        let dir = self.project_dir();
        let steps = [
            toolchain.step(["get", "-t", "-u", "./..."], dir),
            toolchain.step(["mod", "vendor"], dir),
        ];

        for step in &steps {
            step.run_streamed()?;
        }
        Ok(())
    }

    fn log_go_mod(&self) -> Result<()> {
        let path = self.project.go_mod_path();
        match fs::read_to_string(&path) {
            Ok(contents) => {
                info!("go.mod exists at {}, contents: {}", path.display(), contents.trim_end());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("go.mod does not exist: {err}");
                Ok(())
            }
            Err(err) => Err(io_error("read", &path, err)),
        }
    }
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_error("remove", path, err)),
    }
}
