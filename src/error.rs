use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read project path {}: {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a directory ({})", .0.display())]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to run command `{command}`: {source}")]
    CommandStart {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("command `{command}` failed ({status}){}", output_suffix(.output))]
    CommandExit {
        command: String,
        status: ExitStatus,
        output: String,
    },

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove tmp dir {}: {source}", .path.display())]
    TempDirCleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("package name not specified")]
    MissingPackageName,

    #[error("failed to read file ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to unmarshal {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A legacy artifact that could not be removed. Logged, never fatal.
#[derive(Debug)]
pub struct CleanupWarning {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to remove legacy artifact ({}): {}",
            self.path.display(),
            self.source
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn output_suffix(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(", output: {output}")
    }
}
