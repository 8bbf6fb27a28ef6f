// Navigation controller: input modes, the three views and their cursors
// Exactly one handler consumes each key, picked by overlay, then mode, then view

use super::help::help_lines;
use crate::config::Action;
use crate::library::Direction;
use crate::player::Player;
use crate::search;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tracing::debug;

pub const VOLUME_STEP: f32 = 0.05;
const HELP_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Library,
    Albums,
    Queue,
}

impl View {
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(View::Library),
            2 => Some(View::Albums),
            3 => Some(View::Queue),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Library => "Library",
            View::Albums => "Albums",
            View::Queue => "Queue",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlbumFocus {
    #[default]
    AlbumList,
    SongList,
}

/// Selection and scroll offset of one list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub selected: usize,
    pub scroll: usize,
}

impl Cursor {
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn reset(&mut self) {
        *self = Cursor::default();
    }

    /// Move the window so the selection is one of `rows` visible lines.
    pub fn scroll_into_view(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + rows {
            self.scroll = self.selected + 1 - rows;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub ranked: Vec<usize>,
    pub cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search(SearchState),
    Command(String),
    QuitConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help { scroll: usize },
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

// Global actions checked in Normal mode before any view navigation, in order
const GLOBAL_ACTIONS: [Action; 11] = [
    Action::Search,
    Action::Shuffle,
    Action::Repeat,
    Action::Next,
    Action::Prev,
    Action::PlayPause,
    Action::VolumeUp,
    Action::VolumeDown,
    Action::Fadeout,
    Action::SeekForward,
    Action::SeekBackward,
];

#[derive(Debug, Clone)]
pub struct NavigationController {
    mode: InputMode,
    view: View,
    library: Cursor,
    queue: Cursor,
    albums: Cursor,
    album_songs: Cursor,
    album_focus: AlbumFocus,
    overlay: Option<Overlay>,
}

impl NavigationController {
    pub fn new(view: View) -> Self {
        Self {
            mode: InputMode::Normal,
            view,
            library: Cursor::default(),
            queue: Cursor::default(),
            albums: Cursor::default(),
            album_songs: Cursor::default(),
            album_focus: AlbumFocus::AlbumList,
            overlay: None,
        }
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn album_focus(&self) -> AlbumFocus {
        self.album_focus
    }

    pub fn library_cursor(&self) -> Cursor {
        self.library
    }

    pub fn queue_cursor(&self) -> Cursor {
        self.queue
    }

    pub fn album_cursor(&self) -> Cursor {
        self.albums
    }

    pub fn album_song_cursor(&self) -> Cursor {
        self.album_songs
    }

    /// Keep every visible selection inside a window of `rows` lines.
    pub fn fit_to_viewport(&mut self, rows: usize) {
        self.library.scroll_into_view(rows);
        self.queue.scroll_into_view(rows);
        self.albums.scroll_into_view(rows);
        self.album_songs.scroll_into_view(rows);
        if let InputMode::Search(state) = &mut self.mode {
            state.cursor.scroll_into_view(rows);
        }
    }

    /// Move the library selection onto the track that just started.
    pub fn follow_current(&mut self, player: &Player) {
        if let Some(index) = player.current_index() {
            self.library.selected = index;
        }
    }

    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        if view == View::Albums {
            self.album_focus = AlbumFocus::AlbumList;
        }
    }

    pub fn selected_album(&self, player: &Player) -> Option<String> {
        player
            .library
            .album_names()
            .get(self.albums.selected)
            .map(|name| name.to_string())
    }

    pub fn selected_album_tracks(&self, player: &Player) -> Vec<PathBuf> {
        self.selected_album(player)
            .map(|album| player.library.album_tracks(&album).to_vec())
            .unwrap_or_default()
    }

    /// Paths listed by the active view, in display order.
    pub fn view_paths(&self, player: &Player) -> Vec<PathBuf> {
        match self.view {
            View::Library => player.library.playlist().to_vec(),
            View::Queue => player.library.queue().items().to_vec(),
            View::Albums => self.selected_album_tracks(player),
        }
    }

    pub fn view_names(&self, player: &Player) -> Vec<String> {
        self.view_paths(player)
            .iter()
            .map(|path| player.display_name(path))
            .collect()
    }

    fn selected_path(&self, player: &Player) -> Option<PathBuf> {
        let index = match self.view {
            View::Library => self.library.selected,
            View::Queue => self.queue.selected,
            View::Albums => self.album_songs.selected,
        };
        self.view_paths(player).get(index).cloned()
    }

    fn active_cursor_mut(&mut self) -> &mut Cursor {
        match self.view {
            View::Library => &mut self.library,
            View::Queue => &mut self.queue,
            View::Albums => match self.album_focus {
                AlbumFocus::AlbumList => &mut self.albums,
                AlbumFocus::SongList => &mut self.album_songs,
            },
        }
    }

    fn reset_library_cursors(&mut self) {
        self.library.reset();
        self.albums.reset();
        self.album_songs.reset();
        self.album_focus = AlbumFocus::AlbumList;
    }

    pub fn handle_key(&mut self, key: KeyEvent, player: &mut Player) -> KeyOutcome {
        if let Some(overlay) = self.overlay.take() {
            self.overlay = self.handle_overlay_key(overlay, &key, player);
            return KeyOutcome::Continue;
        }

        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::QuitConfirm => self.handle_quit_prompt(&key, player),
            InputMode::Command(buffer) => self.handle_command_input(buffer, &key, player),
            InputMode::Search(state) => {
                self.handle_search_input(state, &key, player);
                KeyOutcome::Continue
            }
            InputMode::Normal => self.handle_normal_key(&key, player),
        }
    }

    fn handle_overlay_key(&mut self, overlay: Overlay, key: &KeyEvent, player: &Player) -> Option<Overlay> {
        let Overlay::Help { scroll } = overlay else {
            // version screen closes on anything
            return None;
        };

        let last_line = help_lines(&player.config.keybindings).len().saturating_sub(1);
        let scroll = match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return None,
            KeyCode::Char('j') | KeyCode::Down => scroll + 1,
            KeyCode::Char('k') | KeyCode::Up => scroll.saturating_sub(1),
            KeyCode::PageDown => scroll + HELP_PAGE,
            KeyCode::PageUp => scroll.saturating_sub(HELP_PAGE),
            _ => scroll,
        };
        Some(Overlay::Help {
            scroll: scroll.min(last_line),
        })
    }

    fn handle_quit_prompt(&mut self, key: &KeyEvent, player: &mut Player) -> KeyOutcome {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                player.persist_settings();
                KeyOutcome::Quit
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn handle_command_input(&mut self, mut buffer: String, key: &KeyEvent, player: &mut Player) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => return self.execute_command(buffer.trim(), player),
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = InputMode::Command(buffer);
            }
            _ => {
                if let Some(c) = printable(key) {
                    buffer.push(c);
                }
                self.mode = InputMode::Command(buffer);
            }
        }
        KeyOutcome::Continue
    }

    /// Run one `:` command line.
    pub fn execute_command(&mut self, command: &str, player: &mut Player) -> KeyOutcome {
        debug!("Command: {}", command);

        if command == ":q" || player.config.keybindings.matches_text(Action::Quit, command) {
            player.persist_settings();
            return KeyOutcome::Quit;
        }

        let (word, argument) = match command.split_once(' ') {
            Some((word, rest)) => (word, Some(rest.trim())),
            None => (command, None),
        };

        match (word, argument) {
            (":help" | ":h", None) => self.overlay = Some(Overlay::Help { scroll: 0 }),
            (":v" | ":version", None) => {
                player.status.clear();
                self.overlay = Some(Overlay::Version);
            }
            (":add" | ":a", Some(folder)) if !folder.is_empty() => {
                if player.add_folder(folder) {
                    self.reset_library_cursors();
                }
            }
            (":refresh", None) => {
                player.refresh_library();
                self.reset_library_cursors();
            }
            (":clear" | ":c", None) => {
                player.clear_queue();
                self.queue.reset();
            }
            (":remove" | ":r", Some(number)) => match number.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    if player.remove_from_queue(n - 1) {
                        self.queue.clamp(player.library.queue().len());
                    }
                }
                _ => player.status.error("Invalid queue index"),
            },
            ("" | ":", None) => {}
            _ => player.status.error(format!("Unknown command: {}", command)),
        }
        KeyOutcome::Continue
    }

    fn start_search(&mut self, player: &mut Player) {
        let total = self.view_paths(player).len();
        self.mode = InputMode::Search(SearchState {
            query: String::new(),
            ranked: (0..total).collect(),
            cursor: Cursor::default(),
        });
        player.status.clear();
    }

    fn handle_search_input(&mut self, mut state: SearchState, key: &KeyEvent, player: &mut Player) {
        if self.view == View::Albums {
            return;
        }

        let bindings = &player.config.keybindings;
        if key.code == KeyCode::Esc || bindings.matches(Action::Quit, key) {
            return;
        } else if let Some(c) = printable(key) {
            state.query.push(c);
            state.cursor.reset();
        } else if bindings.matches(Action::Enter, key) {
            if let Some(&index) = state.ranked.get(state.cursor.selected) {
                self.active_cursor_mut().selected = index;
            }
            return;
        } else if key.code == KeyCode::Backspace {
            if state.query.pop().is_none() {
                return;
            }
            state.cursor.reset();
        } else if bindings.matches(Action::Down, key) {
            state.cursor.down(state.ranked.len());
        } else if bindings.matches(Action::Up, key) {
            state.cursor.up();
        }

        state.ranked = search::rank(&state.query, &self.view_names(player));
        state.cursor.clamp(state.ranked.len());
        self.mode = InputMode::Search(state);
    }

    fn handle_normal_key(&mut self, key: &KeyEvent, player: &mut Player) -> KeyOutcome {
        let plain = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');

        if ctrl_c || (plain && key.code == KeyCode::Char('q')) {
            self.mode = InputMode::QuitConfirm;
            return KeyOutcome::Continue;
        }
        if plain && key.code == KeyCode::Char(':') {
            self.mode = InputMode::Command(":".to_string());
            player.status.clear();
            return KeyOutcome::Continue;
        }

        let in_albums = self.view == View::Albums;
        let action = GLOBAL_ACTIONS.into_iter().find(|action| {
            let seek = matches!(action, Action::SeekForward | Action::SeekBackward);
            !(seek && in_albums) && player.config.keybindings.matches(*action, key)
        });

        match action {
            Some(Action::Search) => {
                if !in_albums {
                    self.start_search(player);
                }
            }
            Some(Action::Shuffle) => player.toggle_shuffle(),
            Some(Action::Repeat) => player.toggle_repeat(),
            Some(Action::Next) => {
                if player.skip(Direction::Forward) {
                    self.follow_current(player);
                }
            }
            Some(Action::Prev) => {
                if player.skip(Direction::Backward) {
                    self.follow_current(player);
                }
            }
            Some(Action::PlayPause) => {
                let selected = self.selected_path(player);
                if player.toggle_play_pause(selected) {
                    self.follow_current(player);
                }
            }
            Some(Action::VolumeUp) => player.change_volume(VOLUME_STEP),
            Some(Action::VolumeDown) => player.change_volume(-VOLUME_STEP),
            Some(Action::Fadeout) => player.fade_out(),
            Some(Action::SeekForward) => player.seek(true),
            Some(Action::SeekBackward) => player.seek(false),
            _ => match key.code {
                KeyCode::Char(c @ '1'..='3') if plain => {
                    if let Some(view) = View::from_number(c as u8 - b'0') {
                        self.switch_view(view);
                    }
                    player.status.clear();
                }
                _ => match self.view {
                    View::Library => self.handle_library_key(key, player),
                    View::Queue => self.handle_queue_key(key, player),
                    View::Albums => self.handle_album_key(key, player),
                },
            },
        }
        KeyOutcome::Continue
    }

    fn handle_library_key(&mut self, key: &KeyEvent, player: &mut Player) {
        let bindings = &player.config.keybindings;
        let len = player.library.playlist().len();
        let selected = player.library.playlist().get(self.library.selected).cloned();

        if bindings.matches(Action::Down, key) {
            self.library.down(len);
        } else if bindings.matches(Action::Up, key) {
            self.library.up();
        } else if bindings.matches(Action::Enter, key) {
            if let Some(path) = selected {
                if player.play_path(&path) {
                    self.follow_current(player);
                }
            }
        } else if bindings.matches(Action::Queue, key) {
            if let Some(path) = selected {
                player.enqueue(&path);
                self.library.down(len);
            }
        }
    }

    fn handle_queue_key(&mut self, key: &KeyEvent, player: &mut Player) {
        let bindings = &player.config.keybindings;
        let len = player.library.queue().len();
        let selected = self.queue.selected;

        if bindings.matches(Action::Down, key) {
            self.queue.down(len);
        } else if bindings.matches(Action::Up, key) {
            self.queue.up();
        } else if bindings.matches(Action::Enter, key) {
            if selected < len && player.play_from_queue(selected) {
                self.follow_current(player);
            }
        } else if key.code == KeyCode::Delete || key.code == KeyCode::Char('d') {
            if selected < len && player.remove_from_queue(selected) {
                self.queue.clamp(player.library.queue().len());
            }
        }
    }

    fn handle_album_key(&mut self, key: &KeyEvent, player: &mut Player) {
        let bindings = &player.config.keybindings;
        let album_count = player.library.albums().len();
        let album = self.selected_album(player);
        let songs = self.selected_album_tracks(player);

        if bindings.matches(Action::Down, key) {
            match self.album_focus {
                AlbumFocus::AlbumList => {
                    if self.albums.selected + 1 < album_count {
                        self.albums.selected += 1;
                        self.album_songs.reset();
                    }
                }
                AlbumFocus::SongList => self.album_songs.down(songs.len()),
            }
        } else if bindings.matches(Action::Up, key) {
            match self.album_focus {
                AlbumFocus::AlbumList => {
                    if self.albums.selected > 0 {
                        self.albums.selected -= 1;
                        self.album_songs.reset();
                    }
                }
                AlbumFocus::SongList => self.album_songs.up(),
            }
        } else if matches!(key.code, KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab) {
            if self.album_focus == AlbumFocus::AlbumList && !songs.is_empty() {
                self.album_focus = AlbumFocus::SongList;
            }
        } else if matches!(key.code, KeyCode::Left | KeyCode::Char('h')) {
            self.album_focus = AlbumFocus::AlbumList;
        } else if bindings.matches(Action::Enter, key) {
            match self.album_focus {
                AlbumFocus::SongList => {
                    if let Some(path) = songs.get(self.album_songs.selected) {
                        if player.play_path(path) {
                            self.follow_current(player);
                        }
                    }
                }
                AlbumFocus::AlbumList => {
                    if !songs.is_empty() {
                        self.album_focus = AlbumFocus::SongList;
                    }
                }
            }
        } else if bindings.matches(Action::Queue, key) {
            match self.album_focus {
                AlbumFocus::SongList => {
                    if let Some(path) = songs.get(self.album_songs.selected) {
                        player.enqueue(path);
                    }
                }
                AlbumFocus::AlbumList => {
                    if let Some(album) = album {
                        player.enqueue_album(&album);
                    }
                }
            }
        }
    }
}

// Printable ASCII typed without Ctrl/Alt
fn printable(key: &KeyEvent) -> Option<char> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) if (' '..='~').contains(&c) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_bounds() {
        let mut cursor = Cursor::default();
        cursor.up();
        assert_eq!(cursor.selected, 0);
        cursor.down(2);
        cursor.down(2);
        assert_eq!(cursor.selected, 1);
        cursor.clamp(1);
        assert_eq!(cursor.selected, 0);
        cursor.clamp(0);
        assert_eq!(cursor.selected, 0);
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut cursor = Cursor { selected: 12, scroll: 0 };
        cursor.scroll_into_view(5);
        assert_eq!(cursor.scroll, 8);
        cursor.selected = 3;
        cursor.scroll_into_view(5);
        assert_eq!(cursor.scroll, 3);
    }

    #[test]
    fn test_printable_filter() {
        let plain = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let ctrl = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(printable(&plain), Some('a'));
        assert_eq!(printable(&ctrl), None);
        assert_eq!(printable(&shifted), Some('A'));
        assert_eq!(printable(&KeyEvent::new(KeyCode::Char('é'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_view_numbers() {
        assert_eq!(View::from_number(2), Some(View::Albums));
        assert_eq!(View::from_number(4), None);
    }
}
