use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::project::LoadError;

/// Files to index under `root`.
///
/// A file path is returned as-is, whatever its extension. A directory is
/// walked recursively for files whose extension matches `extension`
/// (case-insensitive). Unreadable directory entries are skipped. The result
/// is sorted.
pub fn collect_file_paths(root: &Path, extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(LoadError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    debug!(root = %root.display(), files = paths.len(), "collected files");
    Ok(paths)
}
