use super::app_state::AppMode;
use super::tree_adapter::DirTree;
use crate::selection::TriState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

pub struct TuiApp {
    pub(super) tree: DirTree,
    pub(super) current_selection_idx: usize,
    pub(super) scroll_offset: usize,
    pub(super) quit: bool,
    pub(super) confirmed: bool,
    pub(super) mode: AppMode,
    pub(super) filter_input: String,
    pub(super) filter_cursor_pos: usize,
    pub(super) list_viewport_height: usize,
    /// Last error shown in the status line, e.g. an unreadable directory.
    pub(super) status_message: Option<String>,
}

impl TuiApp {
    pub fn new(tree: DirTree) -> Self {
        TuiApp {
            tree,
            current_selection_idx: 0,
            scroll_offset: 0,
            quit: false,
            confirmed: false,
            mode: AppMode::Normal,
            filter_input: String::new(),
            filter_cursor_pos: 0,
            list_viewport_height: 0, // Will be updated by ui_renderer
            status_message: None,
        }
    }

    pub(super) fn select_next_visible_item(&mut self) {
        self.move_selection_in_visible_list(1);
    }

    pub(super) fn select_previous_visible_item(&mut self) {
        self.move_selection_in_visible_list(-1);
    }

    pub(super) fn move_selection_in_visible_list(&mut self, delta: i32) {
        let visible_indices = self.get_visible_item_indices_in_tree_order();
        if visible_indices.is_empty() {
            return;
        }

        let new_idx_in_visible_list = match visible_indices
            .iter()
            .position(|&idx| idx == self.current_selection_idx)
        {
            Some(pos) => (pos as i32 + delta).rem_euclid(visible_indices.len() as i32) as usize,
            None if delta > 0 => 0,
            None => visible_indices.len() - 1,
        };
        self.current_selection_idx = visible_indices[new_idx_in_visible_list];
    }

    pub(super) fn toggle_current_item_selection(&mut self) {
        self.tree.toggle(self.current_selection_idx);
    }

    pub(super) fn select_all_visible_items(&mut self) {
        self.set_visible_items_state(TriState::Selected);
    }

    pub(super) fn deselect_all_visible_items(&mut self) {
        self.set_visible_items_state(TriState::Unselected);
    }

    /// With a filter active only the matching nodes themselves change; the
    /// ancestors shown for context follow from their children.
    fn set_visible_items_state(&mut self, state: TriState) {
        let lower_filter = self.filter_input.to_lowercase();
        for item_idx in self.get_visible_item_indices() {
            let node = &self.tree.nodes()[item_idx];
            if !node.name.to_lowercase().contains(&lower_filter) {
                continue;
            }
            if node.state != state {
                self.tree.set_node_state(item_idx, state);
            }
        }
    }

    pub(super) fn expand_all_directories(&mut self) {
        self.tree.expand_all_loaded();
        self.ensure_selection_is_visible();
    }

    pub(super) fn collapse_all_directories(&mut self) {
        self.tree.collapse_all();
        self.ensure_selection_is_visible();
    }

    pub(super) fn get_visible_item_indices(&self) -> Vec<usize> {
        let lower_filter = self.filter_input.to_lowercase();
        (0..self.tree.nodes().len())
            .filter(|&i| self.tree.is_visible(i))
            .filter(|&i| {
                lower_filter.is_empty()
                    || self.item_matches_filter_or_has_matching_descendant(i, &lower_filter)
            })
            .collect()
    }

    /// Visible nodes in tree order (pre-order), which is what the renderer draws.
    pub(super) fn get_visible_item_indices_in_tree_order(&self) -> Vec<usize> {
        let visible = self.get_visible_item_indices();
        let mut ordered = Vec::with_capacity(visible.len());
        let mut stack = vec![0];
        while let Some(idx) = stack.pop() {
            if visible.binary_search(&idx).is_ok() {
                ordered.push(idx);
            }
            let node = &self.tree.nodes()[idx];
            if node.is_expanded {
                stack.extend(node.children_indices.iter().rev());
            }
        }
        ordered
    }

    pub(super) fn item_matches_filter_or_has_matching_descendant(
        &self,
        item_idx: usize,
        lower_filter: &str,
    ) -> bool {
        let Some(item) = self.tree.nodes().get(item_idx) else {
            return false;
        };
        item.name.to_lowercase().contains(lower_filter)
            || item.children_indices.iter().any(|&child_idx| {
                self.item_matches_filter_or_has_matching_descendant(child_idx, lower_filter)
            })
    }

    pub(super) fn ensure_selection_is_valid_after_filter(&mut self) {
        let visible_indices = self.get_visible_item_indices_in_tree_order();
        if let Some(&first) = visible_indices.first() {
            if !visible_indices.contains(&self.current_selection_idx) {
                self.current_selection_idx = first;
            }
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        if self.list_viewport_height == 0 {
            return;
        }
        let visible_indices = self.get_visible_item_indices_in_tree_order();
        if visible_indices.is_empty() {
            self.scroll_offset = 0;
            return;
        }

        let list_height = self.list_viewport_height;
        match visible_indices
            .iter()
            .position(|&idx| idx == self.current_selection_idx)
        {
            Some(pos) if pos < self.scroll_offset => self.scroll_offset = pos,
            Some(pos) if pos >= self.scroll_offset + list_height => {
                self.scroll_offset = pos.saturating_sub(list_height - 1);
            }
            Some(_) => {}
            None => {
                self.current_selection_idx = visible_indices[0];
                self.scroll_offset = 0;
            }
        }

        let num_visible_items = visible_indices.len();
        if num_visible_items <= list_height {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = self.scroll_offset.min(num_visible_items - list_height);
        }
    }

    pub(super) fn toggle_expansion_and_adjust_selection(&mut self) {
        if let Err(e) = self.tree.toggle_expansion(self.current_selection_idx) {
            warn!(error = %e, "cannot expand directory");
            self.status_message = Some(format!("{:#}", e));
        }
        self.ensure_selection_is_visible();
    }

    /// Moves the cursor to the nearest visible ancestor if its node got hidden.
    pub(super) fn ensure_selection_is_visible(&mut self) {
        let mut candidate_idx = self.current_selection_idx;
        while !self.tree.is_visible(candidate_idx) {
            match self.tree.nodes().get(candidate_idx).and_then(|n| n.parent_index) {
                Some(parent_idx) => candidate_idx = parent_idx,
                None => {
                    candidate_idx = 0;
                    break;
                }
            }
        }
        self.current_selection_idx = candidate_idx;
        self.ensure_selection_is_visible_in_viewport();
    }

    // --- Event handling sub-methods ---
    pub(super) fn handle_normal_mode_input(&mut self, key_event: KeyEvent) {
        self.status_message = None;
        match key_event.code {
            KeyCode::Char('/') => {
                self.mode = AppMode::Filtering;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('y') => {
                self.confirmed = true;
                self.quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next_visible_item(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous_visible_item(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current_item_selection(),
            KeyCode::Char('o') | KeyCode::Tab => self.toggle_expansion_and_adjust_selection(),
            KeyCode::Char('*') => self.expand_all_directories(),
            KeyCode::Char('-') => self.collapse_all_directories(),
            KeyCode::Char('a') => {
                if key_event.modifiers.is_empty() || key_event.modifiers == KeyModifiers::CONTROL {
                    self.select_all_visible_items();
                }
            }
            KeyCode::Char('d') => {
                if key_event.modifiers.is_empty() {
                    self.deselect_all_visible_items();
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_filtering_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
                self.ensure_selection_is_valid_after_filter();
            }
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.filter_input.clear();
                self.filter_cursor_pos = 0;
                self.ensure_selection_is_valid_after_filter();
            }
            KeyCode::Char(c) => {
                self.filter_input.insert(self.filter_cursor_pos, c);
                self.filter_cursor_pos += c.len_utf8();
                self.ensure_selection_is_valid_after_filter();
            }
            KeyCode::Backspace => {
                if let Some(c) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= c.len_utf8();
                    self.filter_input.remove(self.filter_cursor_pos);
                    self.ensure_selection_is_valid_after_filter();
                }
            }
            KeyCode::Left => {
                if let Some(c) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.filter_input[self.filter_cursor_pos..].chars().next() {
                    self.filter_cursor_pos += c.len_utf8();
                }
            }
            _ => {}
        }
    }
}
