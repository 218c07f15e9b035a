use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::info;

use crate::error::{Error, Result};

/// One external command of a migration or update plan.
#[derive(Debug, Clone)]
pub struct CommandStep {
    program: PathBuf,
    args: Vec<String>,
    dir: PathBuf,
    envs: Vec<(String, OsString)>,
}

impl CommandStep {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I, dir: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            dir: dir.to_path_buf(),
            envs: Vec::new(),
        }
    }

    pub fn env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.envs.push((key.to_string(), value.into()));
        self
    }

    /// Command line as shown in logs and error messages, e.g. `go mod tidy`.
    pub fn printable(&self) -> String {
        let mut parts = vec![quote(&self.program.to_string_lossy())];
        parts.extend(self.args.iter().map(|arg| quote(arg)));
        parts.join(" ")
    }

    /// Runs the step and returns its trimmed combined output.
    pub fn run_captured(&self) -> Result<String> {
        info!("$ {}", self.printable());
        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|source| self.start_error(source))?;

        let combined = combined_output(&output);
        if !output.status.success() {
            return Err(Error::CommandExit {
                command: self.printable(),
                status: output.status,
                output: combined,
            });
        }
        Ok(combined)
    }

    /// Runs the step with stdout/stderr attached to the terminal.
    pub fn run_streamed(&self) -> Result<()> {
        info!("$ {}", self.printable());
        let status = self
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| self.start_error(source))?;

        if !status.success() {
            return Err(Error::CommandExit {
                command: self.printable(),
                status,
                output: String::new(),
            });
        }
        Ok(())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.dir);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    fn start_error(&self, source: std::io::Error) -> Error {
        Error::CommandStart {
            command: self.printable(),
            source,
        }
    }
}

fn combined_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !combined.is_empty() && !stderr.is_empty() && !combined.ends_with('\n') {
        combined.push('\n');
    }
    combined.push_str(&stderr);
    combined.trim().to_string()
}

fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(char::is_whitespace) {
        arg.to_string()
    } else {
        format!("\"{}\"", arg.replace('"', "\\\""))
    }
}
