use crate::selection::{DirPath, TriState};

#[derive(Debug, Clone)]
pub struct DirNode {
    pub path: DirPath,
    pub name: String,
    pub depth: usize,
    pub is_expanded: bool,
    /// Subdirectories are listed on first expansion only.
    pub children_loaded: bool,
    pub state: TriState,
    pub children_indices: Vec<usize>,
    pub parent_index: Option<usize>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum AppMode {
    Normal,
    Filtering,
}
