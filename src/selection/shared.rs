use super::path::DirPath;
use super::set::{SelectionSet, TriState};
use crate::error::InvalidPathError;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Cloneable handle to one [`SelectionSet`] shared between the tree and its
/// consumers.
///
/// Every call holds the lock for the whole operation, so a reader never sees a
/// transition between its eviction and insertion steps.
#[derive(Debug, Clone, Default)]
pub struct SharedSelection {
    inner: Arc<Mutex<SelectionSet>>,
}

impl SharedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(
        &self,
        path: impl AsRef<Path>,
        state: TriState,
    ) -> Result<(), InvalidPathError> {
        let dir = DirPath::parse(path)?;
        self.apply(&dir, state);
        Ok(())
    }

    pub fn apply(&self, dir: &DirPath, state: TriState) {
        self.inner.lock().apply(dir, state);
    }

    pub fn is_selected(&self, path: impl AsRef<Path>) -> Result<bool, InvalidPathError> {
        self.inner.lock().is_selected(path)
    }

    pub fn state_of(&self, dir: &DirPath) -> TriState {
        self.inner.lock().state_of(dir)
    }

    /// Copy of the current state, detached from later changes.
    pub fn snapshot(&self) -> SelectionSet {
        self.inner.lock().clone()
    }

    /// Runs `f` with the lock held, for callers that need several steps to be
    /// atomic.
    pub fn with<R>(&self, f: impl FnOnce(&mut SelectionSet) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::thread;

    #[cfg(not(windows))]
    const ROOT: &str = "/";
    #[cfg(windows)]
    const ROOT: &str = r"C:\";

    fn p(rel: &str) -> PathBuf {
        Path::new(ROOT).join(rel)
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedSelection::new();
        let other = shared.clone();
        shared.set_state(p("a"), TriState::Selected).unwrap();
        assert!(other.is_selected(p("a/b")).unwrap());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedSelection::new();
        shared.set_state(p("a"), TriState::Selected).unwrap();
        let snapshot = shared.snapshot();
        shared.set_state(p("a"), TriState::Unselected).unwrap();
        assert_eq!(snapshot.fully_selected_roots(), vec![p("a")]);
        assert!(!shared.is_selected(p("a")).unwrap());
    }

    #[test]
    fn test_concurrent_writers_keep_roots_disjoint() {
        let shared = SharedSelection::new();
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for round in 0..100 {
                        let state = if (round + worker) % 3 == 0 {
                            TriState::Unselected
                        } else {
                            TriState::Selected
                        };
                        let rel = match (round + worker) % 4 {
                            0 => "x",
                            1 => "x/y",
                            2 => "x/y/z",
                            _ => "w",
                        };
                        shared.set_state(p(rel), state).unwrap();
                        // Any path is either under a root or not; never in between.
                        shared.is_selected(p("x/y/z/leaf")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let roots: Vec<DirPath> = shared
            .with(|set| set.fully_selected_roots())
            .iter()
            .map(|r| DirPath::parse(r).unwrap())
            .collect();
        for a in &roots {
            for b in &roots {
                if a != b {
                    assert!(!a.is_ancestor_or_equal(b));
                }
            }
        }
    }
}
