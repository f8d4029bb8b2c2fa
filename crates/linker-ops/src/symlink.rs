//! Symbolic link creation.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use linker_core::{LinkError, PlannedLink};

/// Create the symbolic link described by `link`, creating missing parent
/// directories first.
///
/// An existing entry at the link path is never replaced.
pub fn create_symlink(link: &PlannedLink) -> Result<(), LinkError> {
    let parent = link
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| LinkError::MissingParent {
            path: link.path.clone(),
        })?;

    if !parent.exists() {
        debug!(path = %parent.display(), "Creating parent directory");
        fs::create_dir_all(parent).map_err(|source| LinkError::ParentDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    debug!(%link, "Creating symbolic link");
    symlink(&link.source, &link.path).map_err(|source| LinkError::Symlink {
        path: link.path.clone(),
        target: link.source.clone(),
        source,
    })
}

#[cfg(unix)]
fn symlink(source: &Path, path: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, path)
}

#[cfg(windows)]
fn symlink(source: &Path, path: &Path) -> io::Result<()> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    let resolved = match path.parent() {
        Some(parent) if source.is_relative() => parent.join(source),
        _ => source.to_path_buf(),
    };
    if resolved.is_dir() {
        symlink_dir(source, path)
    } else {
        symlink_file(source, path)
    }
}
