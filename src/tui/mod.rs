mod app_logic;
mod app_state;
mod event_handler;
mod tree_adapter;
mod ui_renderer;

pub use app_state::DirNode;
pub use tree_adapter::DirTree;

pub use self::run_tui::run_tui;

mod run_tui {
    use super::app_logic::TuiApp;
    use super::event_handler::handle_events;
    use super::tree_adapter::DirTree;
    use super::ui_renderer::ui_frame;
    use anyhow::Result;
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};

    /// Runs the interactive tree until the user confirms or quits. Returns
    /// `true` on confirmation; the choices live in the tree's selection.
    pub fn run_tui(tree: DirTree) -> Result<bool> {
        let mut app = TuiApp::new(tree);

        let mut terminal = init_terminal()?;
        let loop_result = run_loop(&mut terminal, &mut app);
        // Restore the terminal even if drawing failed.
        restore_terminal(terminal)?;
        loop_result?;

        Ok(app.confirmed)
    }

    fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut TuiApp) -> Result<()> {
        app.ensure_selection_is_visible();
        while !app.quit {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor().map_err(Into::into)
    }
}
