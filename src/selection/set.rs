use super::path::DirPath;
use crate::error::InvalidPathError;
use std::collections::BTreeSet;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Checkbox state of one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    Unselected,
    /// The directory's own checkbox is indeterminate; descendants are tracked
    /// individually.
    Mixed,
    /// The directory and its whole subtree.
    Selected,
}

/// Hierarchical selection of directories.
///
/// Two collections make up the whole state:
///
/// * `fully_selected`: roots whose entire subtree is selected. No entry is an
///   ancestor of (or equal to) another.
/// * `mixed`: single directories whose own state is indeterminate. They imply
///   nothing about their descendants and never overlap `fully_selected`.
///
/// Any path not in `mixed` and not under a `fully_selected` root is unselected,
/// so membership can be answered for directories that were never stored.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    fully_selected: BTreeSet<DirPath>,
    mixed: BTreeSet<DirPath>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(
        &mut self,
        path: impl AsRef<Path>,
        state: TriState,
    ) -> Result<(), InvalidPathError> {
        let dir = DirPath::parse(path)?;
        self.apply(&dir, state);
        Ok(())
    }

    pub fn is_selected(&self, path: impl AsRef<Path>) -> Result<bool, InvalidPathError> {
        Ok(self.contains(&DirPath::parse(path)?))
    }

    /// True if `dir` is marked mixed or lies in a fully selected subtree.
    pub fn contains(&self, dir: &DirPath) -> bool {
        self.mixed.contains(dir) || self.covering_root(dir).is_some()
    }

    /// State a freshly shown checkbox for `dir` should start in.
    pub fn state_of(&self, dir: &DirPath) -> TriState {
        if self.mixed.contains(dir) {
            TriState::Mixed
        } else if self.covering_root(dir).is_some() {
            TriState::Selected
        } else {
            TriState::Unselected
        }
    }

    pub fn apply(&mut self, dir: &DirPath, state: TriState) {
        match state {
            TriState::Selected => self.select_subtree(dir),
            TriState::Unselected => {
                let was_mixed = self.mixed.remove(dir);
                let evicted = self.evict_subtree(dir);
                trace!(path = %dir, was_mixed, evicted, "unselected");
            }
            TriState::Mixed => {
                let was_full = self.fully_selected.remove(dir);
                self.mixed.insert(dir.clone());
                trace!(path = %dir, was_full, "marked mixed");
            }
        }
    }

    pub fn fully_selected_roots(&self) -> Vec<PathBuf> {
        self.fully_selected.iter().map(DirPath::to_path_buf).collect()
    }

    pub fn mixed_paths(&self) -> Vec<PathBuf> {
        self.mixed.iter().map(DirPath::to_path_buf).collect()
    }

    pub fn len_fully_selected(&self) -> usize {
        self.fully_selected.len()
    }

    pub fn len_mixed(&self) -> usize {
        self.mixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fully_selected.is_empty() && self.mixed.is_empty()
    }

    fn select_subtree(&mut self, dir: &DirPath) {
        if self.fully_selected.contains(dir) {
            return;
        }
        let evicted = self.evict_subtree(dir);
        if let Some(root) = self.covering_root(dir) {
            trace!(path = %dir, covered_by = %root, evicted, "already selected through ancestor");
            return;
        }
        self.mixed.remove(dir);
        self.fully_selected.insert(dir.clone());
        trace!(path = %dir, evicted, "selected subtree");
    }

    /// Removes `dir` and every fully selected root below it. Returns how many
    /// entries were dropped.
    fn evict_subtree(&mut self, dir: &DirPath) -> usize {
        // Descendants sort contiguously right after `dir`.
        let doomed: Vec<DirPath> = self
            .fully_selected
            .range::<DirPath, _>((Bound::Included(dir), Bound::Unbounded))
            .take_while(|entry| dir.is_ancestor_or_equal(entry))
            .cloned()
            .collect();
        for entry in &doomed {
            self.fully_selected.remove(entry);
        }
        doomed.len()
    }

    fn covering_root(&self, dir: &DirPath) -> Option<&DirPath> {
        dir.key_prefixes()
            .find_map(|prefix| self.fully_selected.get(prefix))
    }
}
