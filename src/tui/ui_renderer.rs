use super::app_logic::TuiApp;
use super::app_state::AppMode;
use crate::selection::TriState;
use crate::tree_builder;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

fn draw_help_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let (roots, mixed) = app
        .tree
        .selection()
        .with(|set| (set.len_fully_selected(), set.len_mixed()));
    let status = match &app.status_message {
        Some(message) => Line::from(message.as_str()).style(Style::default().fg(Color::Red)),
        None => Line::from(format!(
            "Selected subtrees: {} | Mixed directories: {}",
            roots, mixed
        )),
    };
    let help_text_lines_content = vec![
        Line::from("Arrows/jk: Nav | Space/Enter: Sel | Tab/o: Fold | y: Confirm | q/Esc: Quit"),
        Line::from("a: Sel All Vis | d: Desel All | *: Expand Loaded | -: Collapse All | /: Filter"),
        status,
    ];
    let help_paragraph = Paragraph::new(help_text_lines_content).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Dirpick Directory Selection"),
    );
    f.render_widget(help_paragraph, area);
}

fn draw_filter_input_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let input_text = format!("/{}", app.filter_input);
    let filter_paragraph = Paragraph::new(input_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filter (Esc to cancel, Enter to apply)"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(filter_paragraph, area);
    let cursor_col = app.filter_input[..app.filter_cursor_pos].chars().count() as u16;
    f.set_cursor_position((area.x + 1 + cursor_col + 1, area.y + 1));
}

fn draw_main_list_block(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let visible_item_indices = app.get_visible_item_indices_in_tree_order();
    let nodes = app.tree.nodes();
    let rows: Vec<(usize, &str)> = visible_item_indices
        .iter()
        .map(|&idx| (nodes[idx].depth, nodes[idx].name.as_str()))
        .collect();
    let labels = tree_builder::build_tree_labels(&rows);

    let window_end = (app.scroll_offset + app.list_viewport_height).min(visible_item_indices.len());
    let window = app.scroll_offset.min(window_end)..window_end;

    let list_items: Vec<ListItem> = visible_item_indices[window.clone()]
        .iter()
        .zip(&labels[window])
        .map(|(&item_idx, label)| {
            let item = &nodes[item_idx];
            let selection_prefix = match item.state {
                TriState::Unselected => "[ ] ",
                TriState::Mixed => "[-] ",
                TriState::Selected => "[x] ",
            };
            let expansion_prefix = if item.children_loaded && item.children_indices.is_empty() {
                "    "
            } else if item.is_expanded {
                "[-] "
            } else {
                "[+] "
            };
            ListItem::new(format!("{}{}{}", expansion_prefix, selection_prefix, label))
        })
        .collect();

    let list_title = if !app.filter_input.is_empty() && app.mode == AppMode::Normal {
        format!("Directories (Filter: '{}')", app.filter_input)
    } else {
        "Select directories".to_string()
    };

    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ListState::default();
    if let Some(pos) = visible_item_indices
        .iter()
        .position(|&idx| idx == app.current_selection_idx)
    {
        if pos >= app.scroll_offset && pos < app.scroll_offset + app.list_viewport_height {
            list_state_for_view.select(Some(pos - app.scroll_offset));
        }
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut TuiApp) {
    let help_lines = 3;
    let filter_input_height = if app.mode == AppMode::Filtering { 3 } else { 0 };
    let top_block_container_height = (help_lines + 2) + filter_input_height;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(top_block_container_height),
            Constraint::Min(0),
        ])
        .split(frame.area());

    let top_container_area = main_chunks[0];
    let list_area = main_chunks[1];

    let top_content_constraints = if app.mode == AppMode::Filtering {
        vec![
            Constraint::Length(help_lines + 2),
            Constraint::Length(filter_input_height),
        ]
    } else {
        vec![Constraint::Length(help_lines + 2)]
    };
    let top_content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(top_content_constraints)
        .split(top_container_area);

    draw_help_block(frame, app, top_content_chunks[0]);
    if app.mode == AppMode::Filtering {
        draw_filter_input_block(frame, app, top_content_chunks[1]);
    }

    draw_main_list_block(frame, app, list_area);
}
