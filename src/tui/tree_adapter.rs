use super::app_state::DirNode;
use crate::file_scanner;
use crate::selection::{DirPath, SharedSelection, TriState};
use anyhow::{Context, Result, anyhow};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Lazily loaded directory tree whose checkboxes drive a [`SharedSelection`].
///
/// The tree decides which paths change state on a click; the selection only
/// stores the outcome. Every node whose state changes is reported exactly once,
/// and only loaded nodes are ever reported.
pub struct DirTree {
    nodes: Vec<DirNode>,
    selection: SharedSelection,
    include_ignored: bool,
}

impl DirTree {
    pub fn new(root: &Path, selection: SharedSelection, include_ignored: bool) -> Result<Self> {
        let path = DirPath::parse(root)?;
        let root_node = DirNode {
            name: path.name(),
            state: selection.state_of(&path),
            path,
            depth: 0,
            is_expanded: false,
            children_loaded: false,
            children_indices: Vec::new(),
            parent_index: None,
        };
        let mut tree = DirTree {
            nodes: vec![root_node],
            selection,
            include_ignored,
        };
        tree.expand(0)?;
        Ok(tree)
    }

    pub fn nodes(&self) -> &[DirNode] {
        &self.nodes
    }

    pub fn selection(&self) -> &SharedSelection {
        &self.selection
    }

    // --- Structure ---

    pub fn ensure_children_loaded(&mut self, idx: usize) -> Result<()> {
        if idx >= self.nodes.len() || self.nodes[idx].children_loaded {
            return Ok(());
        }
        let dir = self.nodes[idx].path.to_path_buf();
        let subdirs = file_scanner::list_subdirectories(&dir, self.include_ignored)
            .with_context(|| format!("cannot list {}", dir.display()))?;

        let depth = self.nodes[idx].depth + 1;
        let mut children_indices = Vec::with_capacity(subdirs.len());
        let mut seen = HashSet::with_capacity(subdirs.len());
        for subdir in subdirs {
            let path = match DirPath::parse(&subdir) {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "skipping directory");
                    continue;
                }
            };
            // Siblings differing only in case share one selection key; the first
            // in sorted order stands for both.
            if !seen.insert(path.clone()) {
                warn!(dir = %path, "skipping directory whose name differs from a sibling only in case");
                continue;
            }
            children_indices.push(self.nodes.len());
            self.nodes.push(DirNode {
                name: path.name(),
                state: self.selection.state_of(&path),
                path,
                depth,
                is_expanded: false,
                children_loaded: false,
                children_indices: Vec::new(),
                parent_index: Some(idx),
            });
        }
        debug!(dir = %dir.display(), children = children_indices.len(), "loaded subdirectories");

        let node = &mut self.nodes[idx];
        node.children_indices = children_indices;
        node.children_loaded = true;
        Ok(())
    }

    pub fn expand(&mut self, idx: usize) -> Result<()> {
        self.ensure_children_loaded(idx)?;
        if let Some(node) = self.nodes.get_mut(idx) {
            node.is_expanded = true;
        }
        Ok(())
    }

    pub fn toggle_expansion(&mut self, idx: usize) -> Result<()> {
        match self.nodes.get(idx) {
            Some(node) if node.is_expanded => {
                self.nodes[idx].is_expanded = false;
                Ok(())
            }
            Some(_) => self.expand(idx),
            None => Ok(()),
        }
    }

    /// Expands every directory whose children are already known.
    pub fn expand_all_loaded(&mut self) {
        for node in self.nodes.iter_mut().filter(|n| n.children_loaded) {
            node.is_expanded = true;
        }
    }

    /// Collapses everything except the root.
    pub fn collapse_all(&mut self) {
        for node in self.nodes.iter_mut() {
            node.is_expanded = node.parent_index.is_none();
        }
    }

    pub fn is_visible(&self, idx: usize) -> bool {
        let mut current = match self.nodes.get(idx) {
            Some(node) => node.parent_index,
            None => return false,
        };
        while let Some(parent_idx) = current {
            if !self.nodes[parent_idx].is_expanded {
                return false;
            }
            current = self.nodes[parent_idx].parent_index;
        }
        true
    }

    /// Loads and expands every directory from the root down to `path` and
    /// returns the node index of `path`.
    pub fn reveal(&mut self, path: &Path) -> Result<usize> {
        let target = DirPath::parse(path)?;
        if !self.nodes[0].path.is_ancestor_or_equal(&target) {
            anyhow::bail!("{} is outside {}", target, self.nodes[0].path);
        }

        let mut idx = 0;
        while self.nodes[idx].path != target {
            self.expand(idx)?;
            idx = self.nodes[idx]
                .children_indices
                .iter()
                .copied()
                .find(|&child| self.nodes[child].path.is_ancestor_or_equal(&target))
                .ok_or_else(|| anyhow!("{} not found under {}", target, self.nodes[idx].path))?;
        }
        Ok(idx)
    }

    // --- Selection ---

    pub fn toggle(&mut self, idx: usize) {
        let Some(node) = self.nodes.get(idx) else {
            return;
        };
        let new_state = match node.state {
            TriState::Unselected | TriState::Mixed => TriState::Selected,
            TriState::Selected => TriState::Unselected,
        };
        self.set_node_state(idx, new_state);
    }

    pub fn select_path(&mut self, path: &Path) -> Result<()> {
        let idx = self.reveal(path)?;
        self.set_node_state(idx, TriState::Selected);
        Ok(())
    }

    pub fn deselect_path(&mut self, path: &Path) -> Result<()> {
        let idx = self.reveal(path)?;
        self.set_node_state(idx, TriState::Unselected);
        Ok(())
    }

    /// Sets a node and its loaded subtree to `state`, then brings every
    /// ancestor back in line with its children.
    pub fn set_node_state(&mut self, idx: usize, state: TriState) {
        if idx >= self.nodes.len() {
            return;
        }
        // A single checkbox click never lands on Mixed.
        let state = if state == TriState::Mixed {
            TriState::Selected
        } else {
            state
        };
        self.apply_state_and_propagate_down(idx, state);
        self.update_ancestor_states(idx);
    }

    /// Post-order: descendants reach the selection before the node itself, so
    /// a descendant's mixed marker is gone before the node absorbs its subtree.
    fn apply_state_and_propagate_down(&mut self, idx: usize, state: TriState) {
        let children_indices = self.nodes[idx].children_indices.clone();
        for child_idx in children_indices {
            self.apply_state_and_propagate_down(child_idx, state);
        }
        if self.nodes[idx].state != state {
            self.nodes[idx].state = state;
            self.selection.apply(&self.nodes[idx].path, state);
        }
    }

    /// Returns `true` if the node's state changed.
    fn recalculate_state_from_children(&mut self, idx: usize) -> bool {
        let children_indices = &self.nodes[idx].children_indices;
        if children_indices.is_empty() {
            return false;
        }

        let mut fully_selected = 0;
        let mut mixed = 0;
        for &child_idx in children_indices {
            match self.nodes[child_idx].state {
                TriState::Selected => fully_selected += 1,
                TriState::Mixed => mixed += 1,
                TriState::Unselected => {}
            }
        }
        let new_state = if fully_selected == children_indices.len() {
            TriState::Selected
        } else if fully_selected > 0 || mixed > 0 {
            TriState::Mixed
        } else {
            TriState::Unselected
        };

        let changed = self.nodes[idx].state != new_state;
        self.nodes[idx].state = new_state;
        changed
    }

    fn update_ancestor_states(&mut self, idx: usize) {
        let mut changed = Vec::new();
        let mut current = self.nodes[idx].parent_index;
        while let Some(parent_idx) = current {
            if !self.recalculate_state_from_children(parent_idx) {
                // Nothing above can change either.
                break;
            }
            changed.push(parent_idx);
            current = self.nodes[parent_idx].parent_index;
        }

        // Ancestors turning mixed give up their subtree claim, so they go
        // first and top-down, re-adding their still selected children. The
        // rest go bottom-up so each evicts what the one below just stored.
        for &ancestor_idx in changed.iter().rev() {
            if self.nodes[ancestor_idx].state == TriState::Mixed {
                self.sync_mixed_ancestor(ancestor_idx);
            }
        }
        for &ancestor_idx in &changed {
            let node = &self.nodes[ancestor_idx];
            if node.state != TriState::Mixed {
                self.selection.apply(&node.path, node.state);
            }
        }
    }

    fn sync_mixed_ancestor(&self, idx: usize) {
        let node = &self.nodes[idx];
        self.selection.apply(&node.path, TriState::Mixed);
        for &child_idx in &node.children_indices {
            let child = &self.nodes[child_idx];
            if child.state == TriState::Selected {
                self.selection.apply(&child.path, TriState::Selected);
            }
        }
    }
}
