use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Copies the contents of `from` into the existing directory `to`.
///
/// Regular files keep their permission bits (`fs::copy` carries them over)
/// and symlinks are recreated as links rather than followed. Directories get
/// default permissions so the copy stays writable and removable even when the
/// source has read-only directories.
pub fn copy_dir_contents(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(from).to_path_buf();
            Error::Io {
                action: "walk",
                path,
                source: err.into(),
            }
        })?;
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(from) else {
            continue;
        };
        let dest = to.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&dest).map_err(|source| io_error("create directory", &dest, source))?;
        } else if file_type.is_symlink() {
            copy_symlink(path, &dest)?;
        } else {
            fs::copy(path, &dest).map_err(|source| io_error("copy", path, source))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> Result<()> {
    let target = fs::read_link(src).map_err(|source| io_error("read link", src, source))?;
    std::os::unix::fs::symlink(&target, dest).map_err(|source| io_error("create link", dest, source))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> Result<()> {
    if src.is_dir() {
        return copy_dir_contents(src, dest);
    }
    fs::copy(src, dest).map_err(|source| io_error("copy", src, source))?;
    Ok(())
}

pub(crate) fn io_error(action: &'static str, path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
