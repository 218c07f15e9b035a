#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// A `go` stand-in that records every invocation and fakes the files the
/// real subcommands would produce.
pub struct FakeGo {
    _dir: TempDir,
    pub binary: PathBuf,
    log: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub dir: PathBuf,
    pub args: String,
    pub goroot: String,
    pub vendor_present: bool,
}

impl FakeGo {
    pub fn new() -> Self {
        Self::build(None, "")
    }

    /// Exits 1 for any invocation whose arguments start with `prefix`.
    pub fn failing_on(prefix: &str) -> Self {
        Self::build(Some(prefix), "")
    }

    /// Runs the shell `snippet` at the end of a successful `go build`.
    pub fn building_with(snippet: &str) -> Self {
        Self::build(None, snippet)
    }

    fn build(fail_prefix: Option<&str>, build_extra: &str) -> Self {
        let dir = tempdir().expect("fake go dir");
        let binary = dir.path().join("go");
        let log = dir.path().join("invocations.log");
        let script = format!(
            r#"#!/bin/sh
if [ -d vendor ]; then vendor=yes; else vendor=no; fi
printf '%s|%s|%s|%s\n' "$(pwd -P)" "$*" "${{GOROOT:-}}" "$vendor" >> '{log}'
case "$*" in
  "{fail}"*) echo "go: simulated failure of $*" >&2; exit 1 ;;
esac
case "$*" in
  "mod init"*)
    if [ -e go.mod ]; then echo "go: go.mod already exists" >&2; exit 1; fi
    printf 'module %s\n\ngo 1.21\n' "${{3:-example.com/inferred}}" > go.mod
    echo "go: creating new go.mod: module ${{3:-example.com/inferred}}" >&2 ;;
  "mod tidy")
    printf '\nrequire example.com/dep v1.0.0\n' >> go.mod
    printf 'example.com/dep v1.0.0 h1:fake=\n' > go.sum ;;
  "mod vendor")
    mkdir -p vendor/example.com/dep
    printf '# example.com/dep v1.0.0\n## explicit\nexample.com/dep\n' > vendor/modules.txt ;;
  "build")
    if [ ! -f go.mod ]; then echo "go: cannot find main module" >&2; exit 1; fi
    touch app
    {build_extra} ;;
  "get -t -u ./...")
    echo "go: upgraded example.com/dep v1.0.0 => v1.1.0" ;;
  *) echo "unexpected invocation: $*" >&2; exit 2 ;;
esac
"#,
            log = log.display(),
            fail = fail_prefix.unwrap_or("__never__"),
            build_extra = if build_extra.is_empty() { ":" } else { build_extra },
        );
        fs::write(&binary, script).expect("write fake go");
        make_executable(&binary);
        Self {
            _dir: dir,
            binary,
            log,
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        let Ok(content) = fs::read_to_string(&self.log) else {
            return Vec::new();
        };
        content
            .lines()
            .map(|line| {
                let mut parts = line.splitn(4, '|');
                Invocation {
                    dir: PathBuf::from(parts.next().unwrap_or_default()),
                    args: parts.next().unwrap_or_default().to_string(),
                    goroot: parts.next().unwrap_or_default().to_string(),
                    vendor_present: parts.next() == Some("yes"),
                }
            })
            .collect()
    }

    pub fn args(&self) -> Vec<String> {
        self.invocations().into_iter().map(|inv| inv.args).collect()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod fake go");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

pub const STEP_YML: &str = r#"title: Example step
toolkit:
  go:
    package_name: github.com/example/step-example
"#;

/// A dep-managed project: `main.go`, `step.yml`, `Gopkg.*`, `Godeps/` and a stale `vendor/`.
pub fn legacy_project() -> TempDir {
    let tmp = tempdir().expect("project dir");
    let root = tmp.path();
    fs::write(
        root.join("main.go"),
        "package main\n\nimport \"example.com/dep\"\n\nfunc main() { dep.Run() }\n",
    )
    .expect("main.go");
    fs::write(root.join("step.yml"), STEP_YML).expect("step.yml");
    fs::write(root.join("Gopkg.lock"), "# dep lock\n").expect("Gopkg.lock");
    fs::write(root.join("Gopkg.toml"), "# dep manifest\n").expect("Gopkg.toml");
    fs::create_dir_all(root.join("Godeps")).expect("Godeps");
    fs::write(root.join("Godeps/Godeps.json"), "{}\n").expect("Godeps.json");
    fs::create_dir_all(root.join("vendor/github.com/old/pkg")).expect("vendor");
    fs::write(root.join("vendor/github.com/old/pkg/pkg.go"), "package pkg\n").expect("vendored");
    tmp
}

pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize")
}
