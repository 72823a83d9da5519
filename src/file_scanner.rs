use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

fn walker(root: &Path, max_depth: Option<usize>, include_ignored: bool) -> WalkBuilder {
    let mut walker = WalkBuilder::new(root);
    walker.max_depth(max_depth);
    if include_ignored {
        walker.git_ignore(false).ignore(false);
    }
    walker
}

/// Immediate subdirectories of `dir`, sorted by path.
pub fn list_subdirectories(dir: &Path, include_ignored: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let mut subdirs = Vec::new();
    for result in walker(dir, Some(1), include_ignored).build() {
        let dirent = match result {
            Ok(v) => v,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping entry while listing");
                continue;
            }
        };
        // The walker yields `dir` itself at depth 0.
        if dirent.depth() == 0 {
            continue;
        }
        let path = dirent.into_path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }

    subdirs.sort();
    Ok(subdirs)
}

/// Files under `root`; `recursive == false` stops at files directly inside it.
pub fn scan_files(root: &Path, recursive: bool, include_ignored: bool) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root)
        .with_context(|| format!("cannot read directory {}", root.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let max_depth = if recursive { None } else { Some(1) };
    let mut files = Vec::new();
    for result in walker(root, max_depth, include_ignored).build() {
        let dirent = match result {
            Ok(v) => v,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping entry during scan");
                continue;
            }
        };
        let path = dirent.into_path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
