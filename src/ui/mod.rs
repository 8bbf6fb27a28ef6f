// Terminal UI - navigation, status line and the frame snapshot are plain
// state; drawing and the terminal itself sit behind the `tui` feature

pub mod app;      // main loop state
pub mod events;   // key polling
pub mod help;     // help and version screens
pub mod nav;      // modes, views, cursors
pub mod snapshot; // per-frame view model
pub mod status;   // transient status messages

#[cfg(feature = "tui")]
mod render; // ratatui drawing

#[cfg(feature = "tui")]
pub use app::App;
pub use app::RenderLoop;
pub use nav::{KeyOutcome, NavigationController, View};
pub use snapshot::RenderSnapshot;
pub use status::StatusLine;

#[cfg(feature = "tui")]
pub use terminal::TerminalManager;

#[cfg(feature = "tui")]
mod terminal {
    use anyhow::Result;
    use crossterm::{
        cursor, execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{backend::CrosstermBackend, Terminal};
    use std::io;

    pub struct TerminalManager {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
        _cleanup_guard: CleanupGuard,
    }

    struct CleanupGuard;

    impl Drop for CleanupGuard {
        fn drop(&mut self) {
            // restore even when the loop bails out with an error
            let _ = disable_raw_mode();

            let mut stdout = io::stdout();
            let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
        }
    }

    impl TerminalManager {
        pub fn new() -> Result<Self> {
            // a previous crash can leave raw mode behind
            let _ = disable_raw_mode();
            let mut stdout = io::stdout();
            let _ = execute!(stdout, LeaveAlternateScreen);

            enable_raw_mode()?;
            execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;
            terminal.clear()?;

            Ok(Self {
                terminal,
                _cleanup_guard: CleanupGuard,
            })
        }

        pub fn draw<F>(&mut self, f: F) -> Result<()>
        where
            F: FnOnce(&mut ratatui::Frame),
        {
            self.terminal.draw(f)?;
            Ok(())
        }

        pub fn size(&self) -> Result<ratatui::layout::Rect> {
            let size = self.terminal.size()?;
            Ok(ratatui::layout::Rect::new(0, 0, size.width, size.height))
        }
    }

    impl Drop for TerminalManager {
        fn drop(&mut self) {
            let _ = self.terminal.clear();
            let _ = self.terminal.show_cursor();
        }
    }
}
