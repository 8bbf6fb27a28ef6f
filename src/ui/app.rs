use super::nav::{KeyOutcome, NavigationController, View};
use super::snapshot::RenderSnapshot;
use crate::player::Player;
use crossterm::event::KeyEvent;
use std::time::Instant;

/// One tick of the main loop minus the terminal: end-of-track handling,
/// then at most one key, then a frame.
pub struct RenderLoop {
    pub player: Player,
    pub nav: NavigationController,
}

impl RenderLoop {
    pub fn new(player: Player) -> Self {
        let view = View::from_number(player.config.default_view).unwrap_or(View::Library);
        Self {
            nav: NavigationController::new(view),
            player,
        }
    }

    /// Start the next track if the current one ran out.
    pub fn advance(&mut self) {
        if self.player.resolve_finished() {
            self.nav.follow_current(&self.player);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        self.nav.handle_key(key, &mut self.player)
    }

    pub fn snapshot(&mut self, rows: usize) -> RenderSnapshot {
        RenderSnapshot::build(&mut self.player, &mut self.nav, rows, Instant::now())
    }
}

#[cfg(feature = "tui")]
pub use terminal_app::App;

#[cfg(feature = "tui")]
mod terminal_app {
    use super::RenderLoop;
    use crate::player::Player;
    use crate::ui::events::poll_key;
    use crate::ui::nav::KeyOutcome;
    use crate::ui::render;
    use crate::ui::TerminalManager;
    use anyhow::Result;
    use std::time::{Duration, Instant};
    use tracing::info;

    const FRAME_INTERVAL: Duration = Duration::from_millis(16);
    const IDLE_SLEEP: Duration = Duration::from_millis(5);

    pub struct App {
        terminal: TerminalManager,
        state: RenderLoop,
    }

    impl App {
        pub fn new(player: Player) -> Result<Self> {
            let terminal = TerminalManager::new()?;
            Ok(Self {
                terminal,
                state: RenderLoop::new(player),
            })
        }

        pub async fn run(&mut self) -> Result<()> {
            let mut last_frame: Option<Instant> = None;
            let mut dirty = true;

            loop {
                self.state.advance();

                let due = last_frame.map_or(true, |at| at.elapsed() >= FRAME_INTERVAL);
                if dirty || due {
                    let rows = render::body_rows(self.terminal.size()?.height);
                    let snapshot = self.state.snapshot(rows);
                    self.terminal.draw(|f| render::draw(f, &snapshot))?;
                    last_frame = Some(Instant::now());
                    dirty = false;
                }

                match poll_key(Duration::ZERO)? {
                    Some(key) => {
                        if self.state.handle_key(key) == KeyOutcome::Quit {
                            info!("Quit requested");
                            return Ok(());
                        }
                        dirty = true;
                    }
                    None => tokio::time::sleep(IDLE_SLEEP).await,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{FileTagReader, ManualClock, MemoryMixer};
    use crate::config::Config;
    use crate::context::AppContext;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_starts_in_configured_view() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::in_dir(dir.path(), Arc::new(FileTagReader::new()));
        let config = Config {
            default_view: 3,
            ..Config::default()
        };
        let player = Player::new(ctx, config, Box::new(MemoryMixer::new()), Box::new(ManualClock::new(0.0)));

        let mut state = RenderLoop::new(player);
        assert_eq!(state.nav.view(), View::Queue);
        assert!(state.snapshot(10).status_bar.starts_with(" Queue | 0 tracks"));
    }
}
