//! JWalk-based tree collector.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, warn};

use linker_core::Node;

/// Materializes the tree below a root directory.
///
/// Every entry becomes a [`Node`]: symbolic links are recorded with their raw
/// target and never followed, directories are expanded recursively and
/// everything else is a leaf. Children are ordered by basename.
#[derive(Debug, Clone, Default)]
pub struct TreeCollector {
    _private: (),
}

impl TreeCollector {
    /// Create a new collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the direct children of `root`, each fully expanded.
    ///
    /// A missing root, or one that is not a directory, yields an empty
    /// forest rather than an error.
    pub fn collect(&self, root: impl AsRef<Path>) -> Vec<Node> {
        let root = root.as_ref();
        let root_path = match std::path::absolute(root) {
            Ok(path) => path,
            Err(err) => {
                warn!(path = %root.display(), error = %err, "Unable to resolve directory");
                return Vec::new();
            }
        };

        match std::fs::metadata(&root_path) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                debug!(path = %root_path.display(), "Not a directory, nothing to collect");
                return Vec::new();
            }
            Err(err) => {
                debug!(path = %root_path.display(), error = %err, "Unable to read directory");
                return Vec::new();
            }
        }

        let walk_path = walk_root(&root_path);
        let mut entries = self.collect_entries(&walk_path, &root_path);
        build_nodes(&root_path, &mut entries)
    }

    /// Collect all entries using jwalk, grouped by parent directory.
    ///
    /// Entries are walked below `walk_path` and reported below `root_path`.
    fn collect_entries(&self, walk_path: &Path, root_path: &Path) -> HashMap<PathBuf, Vec<EntryInfo>> {
        let walker = WalkDir::new(walk_path)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .min_depth(1);

        let mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>> = HashMap::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    warn!(path = %path.display(), error = %err, "Unable to handle entry");
                    continue;
                }
            };

            let path = rebase(entry.path(), walk_path, root_path);
            let Some(parent) = path.parent().map(Path::to_path_buf) else {
                continue;
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_symlink() {
                match std::fs::read_link(entry.path()) {
                    Ok(source) => EntryKind::Symlink(source),
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "Unable to read link");
                        continue;
                    }
                }
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            entries_by_parent
                .entry(parent)
                .or_default()
                .push(EntryInfo { path, kind });
        }

        entries_by_parent
    }
}

/// Collect the tree below `root` with a default collector.
pub fn collect_nodes(root: impl AsRef<Path>) -> Vec<Node> {
    TreeCollector::new().collect(root)
}

/// A symlinked root is walked through its resolved location, jwalk would
/// otherwise report the link itself instead of its contents.
fn walk_root(root_path: &Path) -> PathBuf {
    let is_symlink = std::fs::symlink_metadata(root_path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);

    if is_symlink {
        std::fs::canonicalize(root_path).unwrap_or_else(|_| root_path.to_path_buf())
    } else {
        root_path.to_path_buf()
    }
}

/// Move `path` from below `walk_path` to the same place below `root_path`.
fn rebase(path: PathBuf, walk_path: &Path, root_path: &Path) -> PathBuf {
    if walk_path == root_path {
        return path;
    }

    match path.strip_prefix(walk_path) {
        Ok(relative) => root_path.join(relative),
        Err(_) => path,
    }
}

/// Recursively build the nodes below `path`.
fn build_nodes(path: &Path, entries_by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>) -> Vec<Node> {
    let mut children = entries_by_parent.remove(path).unwrap_or_default();
    children.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    children
        .into_iter()
        .map(|entry| match entry.kind {
            EntryKind::Directory => {
                let nodes = build_nodes(&entry.path, entries_by_parent);
                Node::branch(entry.path, nodes)
            }
            EntryKind::Symlink(source) => Node::link(entry.path, source),
            EntryKind::File => Node::leaf(entry.path),
        })
        .collect()
}

/// Temporary struct for collecting entry information.
struct EntryInfo {
    path: PathBuf,
    kind: EntryKind,
}

enum EntryKind {
    Directory,
    Symlink(PathBuf),
    File,
}
