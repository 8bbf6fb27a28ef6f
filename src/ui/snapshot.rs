// Everything one frame shows, computed without touching the terminal
// The renderer only lays these strings out

use super::help::{help_lines, version_text};
use super::nav::{AlbumFocus, Cursor, InputMode, NavigationController, Overlay, View};
use crate::audio::{format_time, PlaybackState};
use crate::error::StatusKind;
use crate::player::Player;
use std::time::Instant;

pub const HINT_LINE: &str =
    " [c]Play/Pause [n]Next [p]Prev [/]Search [1]Library [2]Albums [3]Queue [:help]";

#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub state: PlaybackState,
    pub title: Option<String>,
    pub elapsed: String,
    pub total: String,
    pub progress: f64,
    pub volume_percent: u32,
}

impl NowPlaying {
    pub fn line(&self) -> String {
        let icon = match self.state {
            PlaybackState::Playing => "▶",
            PlaybackState::Paused => "❚❚",
            PlaybackState::Stopped => "■",
        };
        match &self.title {
            Some(title) => format!(
                "{} {} {}/{} Vol:{}%",
                icon, title, self.elapsed, self.total, self.volume_percent
            ),
            None => format!("{} No track playing", icon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub text: String,
    pub timestamp: Option<String>,
    pub playing: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPane {
    pub title: String,
    pub rows: Vec<ListRow>,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Single(ListPane),
    Albums { albums: ListPane, songs: ListPane },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Search(String),
    Command(String),
    QuitConfirm,
}

impl Prompt {
    pub fn text(&self) -> String {
        match self {
            Prompt::Search(query) => format!("/{}", query),
            Prompt::Command(buffer) => buffer.clone(),
            Prompt::QuitConfirm => "Quit wmus? (y/n)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayView {
    Help { lines: Vec<String>, scroll: usize },
    Version(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub now_playing: NowPlaying,
    pub body: Body,
    pub status_bar: String,
    pub status: Option<(String, StatusKind)>,
    pub prompt: Option<Prompt>,
    pub overlay: Option<OverlayView>,
}

impl RenderSnapshot {
    /// Build the frame for a body area `rows` lines tall, scrolling the
    /// navigation cursors so their selection stays visible.
    pub fn build(player: &mut Player, nav: &mut NavigationController, rows: usize, now: Instant) -> Self {
        nav.fit_to_viewport(rows);

        let body = match nav.mode() {
            InputMode::Search(state) if nav.view() != View::Albums => {
                search_pane(player, nav, &state.ranked, state.cursor, rows)
            }
            _ => match nav.view() {
                View::Library => Body::Single(track_pane(
                    player,
                    "Library",
                    player.library.playlist(),
                    nav.library_cursor(),
                    rows,
                    false,
                )),
                View::Queue => Body::Single(track_pane(
                    player,
                    "Queue",
                    player.library.queue().items(),
                    nav.queue_cursor(),
                    rows,
                    true,
                )),
                View::Albums => album_panes(player, nav, rows),
            },
        };

        let prompt = match nav.mode() {
            InputMode::Normal => None,
            InputMode::Search(state) => Some(Prompt::Search(state.query.clone())),
            InputMode::Command(buffer) => Some(Prompt::Command(buffer.clone())),
            InputMode::QuitConfirm => Some(Prompt::QuitConfirm),
        };

        let overlay = nav.overlay().map(|overlay| match overlay {
            Overlay::Help { scroll } => OverlayView::Help {
                lines: help_lines(&player.config.keybindings),
                scroll,
            },
            Overlay::Version => OverlayView::Version(version_text()),
        });

        Self {
            now_playing: now_playing(player),
            status_bar: status_bar(player, nav),
            status: player
                .status
                .current_at(now)
                .map(|message| (message.text.clone(), message.kind)),
            body,
            prompt,
            overlay,
        }
    }
}

fn now_playing(player: &mut Player) -> NowPlaying {
    let state = player.engine.state();
    let volume_percent = (player.engine.volume() * 100.0).round() as u32;
    let position = player.engine.position();

    let Some(path) = player.engine.current_path().map(|p| p.to_path_buf()) else {
        return NowPlaying {
            state,
            title: None,
            elapsed: format_time(0),
            total: "--:--".to_string(),
            progress: 0.0,
            volume_percent,
        };
    };

    let progress = match player.engine.duration() {
        Some(duration) if duration > 0.0 => (position / duration).clamp(0.0, 1.0),
        _ => 0.0,
    };

    NowPlaying {
        state,
        title: Some(player.display_name(&path)),
        elapsed: format_time(position as u64),
        total: player.timestamp(&path),
        progress,
        volume_percent,
    }
}

fn status_bar(player: &Player, nav: &NavigationController) -> String {
    let total = nav.view_paths(player).len();
    let flag = |on: bool| if on { "ON" } else { "OFF" };

    let mut text = format!(
        " {} | {} tracks | Shuffle: {} | Repeat: {}",
        nav.view().title(),
        total,
        flag(player.library.shuffle),
        flag(player.library.repeat),
    );
    if let InputMode::Search(state) = nav.mode() {
        if !state.ranked.is_empty() {
            text.push_str(&format!(" | {}/{} matches", state.ranked.len(), total));
        }
    }
    text
}

fn window(cursor: Cursor, len: usize, rows: usize) -> std::ops::Range<usize> {
    let start = cursor.scroll.min(len);
    start..(start + rows).min(len)
}

fn track_pane(
    player: &Player,
    title: &str,
    paths: &[std::path::PathBuf],
    cursor: Cursor,
    rows: usize,
    numbered: bool,
) -> ListPane {
    let current = player.engine.current_path();
    let width = paths.len().to_string().len();

    let rows = window(cursor, paths.len(), rows)
        .map(|index| {
            let path = &paths[index];
            let name = player.display_name(path);
            let text = if numbered {
                format!("{:>width$}. {}", index + 1, name, width = width)
            } else {
                name
            };
            ListRow {
                text,
                timestamp: Some(player.timestamp(path)),
                playing: current == Some(path.as_path()),
                selected: index == cursor.selected,
            }
        })
        .collect();

    ListPane {
        title: title.to_string(),
        rows,
        focused: true,
    }
}

fn search_pane(player: &Player, nav: &NavigationController, ranked: &[usize], cursor: Cursor, rows: usize) -> Body {
    let names = nav.view_names(player);
    let rows = window(cursor, ranked.len(), rows)
        .filter_map(|position| {
            names.get(ranked[position]).map(|name| ListRow {
                text: name.clone(),
                timestamp: None,
                playing: false,
                selected: position == cursor.selected,
            })
        })
        .collect();

    Body::Single(ListPane {
        title: format!("{} (search)", nav.view().title()),
        rows,
        focused: true,
    })
}

fn album_panes(player: &Player, nav: &NavigationController, rows: usize) -> Body {
    let names = player.library.album_names();
    let album_cursor = nav.album_cursor();
    let focus = nav.album_focus();

    let album_rows = window(album_cursor, names.len(), rows)
        .map(|index| ListRow {
            text: format!("{} ({})", names[index], player.library.album_tracks(names[index]).len()),
            timestamp: None,
            playing: false,
            selected: index == album_cursor.selected,
        })
        .collect();

    let songs = nav.selected_album_tracks(player);
    let title = nav.selected_album(player).unwrap_or_else(|| "Songs".to_string());
    let mut songs_pane = track_pane(player, &title, &songs, nav.album_song_cursor(), rows, false);
    songs_pane.focused = focus == AlbumFocus::SongList;
    if !songs_pane.focused {
        // only the focused column shows a pointer
        songs_pane.rows.iter_mut().for_each(|row| row.selected = false);
    }

    Body::Albums {
        albums: ListPane {
            title: "Albums".to_string(),
            rows: album_rows,
            focused: focus == AlbumFocus::AlbumList,
        },
        songs: songs_pane,
    }
}
