use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::migrate::Toolchain;

pub const STEP_CONFIG_FILE: &str = "step.yml";

const GO_BINARY_ENV: &str = "MODUPDATE_GO";
const GOROOT_ENV: &str = "MODUPDATE_GOROOT";

#[derive(Debug, Clone)]
pub struct LoadedStepConfig {
    pub path: PathBuf,
    pub data: StepConfig,
}

impl LoadedStepConfig {
    pub fn go_toolkit(&self) -> Option<&GoToolkit> {
        self.data.go_toolkit()
    }
}

/// The subset of a step definition that drives the migration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StepConfig {
    #[serde(default)]
    pub toolkit: Option<StepToolkit>,
}

impl StepConfig {
    pub fn go_toolkit(&self) -> Option<&GoToolkit> {
        self.toolkit.as_ref().and_then(|toolkit| toolkit.go.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StepToolkit {
    #[serde(default)]
    pub go: Option<GoToolkit>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GoToolkit {
    #[serde(default)]
    pub package_name: String,
}

impl GoToolkit {
    pub fn package_name(&self) -> &str {
        self.package_name.trim()
    }
}

pub fn load_step_config(project_dir: &Path) -> Result<LoadedStepConfig, ConfigError> {
    let path = project_dir.join(STEP_CONFIG_FILE);
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let data = parse_yaml_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    Ok(LoadedStepConfig { path, data })
}

pub(crate) fn parse_yaml_str(content: &str) -> Result<StepConfig, serde_yaml::Error> {
    // An empty document deserializes to unit, not to an empty mapping.
    if content.trim().is_empty() {
        return Ok(StepConfig::default());
    }
    serde_yaml::from_str(content)
}

/// Toolchain from `MODUPDATE_GO` / `MODUPDATE_GOROOT`, falling back to `go` on `PATH`.
pub fn toolchain_from_env() -> Toolchain {
    toolchain_from_vars(
        std::env::var_os(GO_BINARY_ENV),
        std::env::var_os(GOROOT_ENV),
    )
}

fn toolchain_from_vars(binary: Option<OsString>, goroot: Option<OsString>) -> Toolchain {
    let mut toolchain = Toolchain::default();
    if let Some(binary) = non_blank(binary) {
        toolchain.binary = PathBuf::from(binary);
    }
    toolchain.goroot = non_blank(goroot).map(PathBuf::from);
    toolchain
}

fn non_blank(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.to_string_lossy().trim().is_empty())
}
