//! Turns a directory selection into the list of files it covers.
//!
//! Fully selected roots are walked recursively. Mixed directories contribute
//! only the files directly inside them; their selected subdirectories appear as
//! roots of their own.

use crate::file_scanner;
use crate::selection::SelectionSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPlan {
    pub recursive_roots: Vec<PathBuf>,
    pub flat_dirs: Vec<PathBuf>,
}

impl ScanPlan {
    pub fn from_selection(selection: &SelectionSet) -> Self {
        ScanPlan {
            recursive_roots: selection.fully_selected_roots(),
            flat_dirs: selection.mixed_paths(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recursive_roots.is_empty() && self.flat_dirs.is_empty()
    }

    /// Files covered by the plan, sorted and deduplicated. Directories that
    /// vanished since they were selected are skipped with a warning.
    pub fn collect_files(&self, include_ignored: bool) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let targets = self
            .recursive_roots
            .iter()
            .map(|dir| (dir, true))
            .chain(self.flat_dirs.iter().map(|dir| (dir, false)));

        for (dir, recursive) in targets {
            match file_scanner::scan_files(dir, recursive, include_ignored) {
                Ok(found) => {
                    debug!(dir = %dir.display(), recursive, files = found.len(), "scanned");
                    files.extend(found);
                }
                Err(e) => warn!(dir = %dir.display(), error = %e, "skipping directory"),
            }
        }

        files.sort();
        files.dedup();
        files
    }

    /// Text report: the selected directories relative to `root`, then the files.
    pub fn render(&self, root: &Path, files: &[PathBuf]) -> String {
        let mut out = String::new();

        out.push_str(&format!("# Selected subtrees ({})\n", self.recursive_roots.len()));
        for dir in &self.recursive_roots {
            out.push_str(&format!("{}/\n", relative_display(dir, root)));
        }
        out.push('\n');

        out.push_str(&format!(
            "# Directories scanned without subdirectories ({})\n",
            self.flat_dirs.len()
        ));
        for dir in &self.flat_dirs {
            out.push_str(&format!("{}/\n", relative_display(dir, root)));
        }
        out.push('\n');

        out.push_str(&format!("# Files ({})\n", files.len()));
        for file in files {
            out.push_str(&format!("{}\n", relative_display(file, root)));
        }
        out
    }
}

fn relative_display(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::TriState;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_mixed_directories_are_scanned_flat() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("keep/deep")).unwrap();
        fs::create_dir_all(root.join("skip")).unwrap();
        fs::write(root.join("top.txt"), "t").unwrap();
        fs::write(root.join("keep/k.txt"), "k").unwrap();
        fs::write(root.join("keep/deep/d.txt"), "d").unwrap();
        fs::write(root.join("skip/s.txt"), "s").unwrap();

        let mut selection = SelectionSet::new();
        selection.set_state(root, TriState::Mixed).unwrap();
        selection.set_state(root.join("keep"), TriState::Selected).unwrap();

        let plan = ScanPlan::from_selection(&selection);
        let files = plan.collect_files(false);
        assert_eq!(
            files,
            vec![
                root.join("keep/deep/d.txt"),
                root.join("keep/k.txt"),
                root.join("top.txt"),
            ]
        );
    }

    #[test]
    fn test_vanished_directory_is_skipped() {
        let dir = tempdir().unwrap();
        let mut selection = SelectionSet::new();
        selection.set_state(dir.path().join("gone"), TriState::Selected).unwrap();
        let plan = ScanPlan::from_selection(&selection);
        assert!(plan.collect_files(false).is_empty());
    }

    #[test]
    fn test_render_lists_paths_relative_to_root() {
        let root = std::env::temp_dir().join("dirpick-render");
        let plan = ScanPlan {
            recursive_roots: vec![root.join("photos")],
            flat_dirs: vec![root.clone()],
        };
        let files = vec![root.join("photos").join("a.jpg")];
        let rendered = plan.render(&root, &files);
        let photo = Path::new("photos").join("a.jpg");
        assert_eq!(
            rendered,
            format!(
                "# Selected subtrees (1)\nphotos/\n\n# Directories scanned without subdirectories (1)\n./\n\n# Files (1)\n{}\n",
                photo.display()
            )
        );
    }

    #[test]
    fn test_empty_selection_gives_empty_plan() {
        assert!(ScanPlan::from_selection(&SelectionSet::new()).is_empty());
    }
}
