// Keyboard-driven sessions against a temp music folder, no terminal or sound card

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wmus::audio::{ManualClock, MemoryMixer, TagReader, TrackTags};
use wmus::ui::nav::{AlbumFocus, InputMode, Overlay};
use wmus::ui::{KeyOutcome, RenderLoop, View};
use wmus::{Action, AppContext, Config, KeySpec, PlaybackState, Player, PlayerResult, StatusKind};

// title from the file stem, album from the folder unless it sits at the root
struct FolderTags;

impl TagReader for FolderTags {
    fn read_tags(&self, path: &Path) -> PlayerResult<TrackTags> {
        let album = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| n != "music");
        Ok(TrackTags {
            title: path.file_stem().map(|s| s.to_string_lossy().into_owned()),
            artist: None,
            album,
            duration_seconds: 180,
        })
    }
}

struct Session {
    dir: TempDir,
    app: RenderLoop,
    mixer: MemoryMixer,
    clock: ManualClock,
}

impl Session {
    // playlist order: Jazz/gamma, Rock/alpha, Rock/beta, delta
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let music = dir.path().join("music");
        for file in ["Rock/alpha.mp3", "Rock/beta.mp3", "Jazz/gamma.mp3", "delta.mp3"] {
            let path = music.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"x").unwrap();
        }

        let ctx = AppContext::in_dir(dir.path().join("state"), Arc::new(FolderTags));
        let config = Config {
            music_folder: music.to_string_lossy().into_owned(),
            ..Config::default()
        };
        let mixer = MemoryMixer::new();
        let clock = ManualClock::new(50.0);
        let mut player = Player::new(ctx, config, Box::new(mixer.clone()), Box::new(clock.clone()));
        assert_eq!(player.load_library(), 4);

        Self {
            dir,
            app: RenderLoop::new(player),
            mixer,
            clock,
        }
    }

    fn key(&mut self, code: KeyCode) -> KeyOutcome {
        self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn keys(&mut self, text: &str) -> KeyOutcome {
        let mut outcome = KeyOutcome::Continue;
        for c in text.chars() {
            outcome = self.key(KeyCode::Char(c));
        }
        outcome
    }

    fn command(&mut self, line: &str) -> KeyOutcome {
        self.keys(line);
        self.key(KeyCode::Enter)
    }

    fn track(&self, index: usize) -> PathBuf {
        self.app.player.library.playlist()[index].clone()
    }

    fn current(&self) -> Option<PathBuf> {
        self.app.player.engine.current_path().map(Path::to_path_buf)
    }

    fn status(&self) -> Option<&str> {
        self.app.player.status.last_text()
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("state").join("config.toml")
    }
}

#[test]
fn test_enter_plays_selected_track() {
    let mut s = Session::new();
    s.keys("j");
    s.key(KeyCode::Enter);

    assert_eq!(s.current(), Some(s.track(1)));
    assert_eq!(s.app.player.engine.state(), PlaybackState::Playing);
    assert_eq!(s.app.nav.library_cursor().selected, 1);
    assert_eq!(s.app.player.status.current(), None);
}

#[test]
fn test_missing_file_reports_not_found() {
    let mut s = Session::new();
    fs::remove_file(s.track(1)).unwrap();
    s.keys("j");
    s.key(KeyCode::Enter);

    let message = s.app.player.status.current().unwrap();
    assert_eq!(message.text, "File not found: alpha.mp3");
    assert_eq!(message.kind, StatusKind::Error);
    assert_eq!(s.app.player.engine.state(), PlaybackState::Stopped);
}

#[test]
fn test_search_confirm_moves_library_selection() {
    let mut s = Session::new();
    s.keys("/alp");

    let frame = s.app.snapshot(10);
    assert!(frame.status_bar.ends_with(" | 1/4 matches"));

    s.key(KeyCode::Enter);
    assert_eq!(s.app.nav.mode(), &InputMode::Normal);
    assert_eq!(s.app.nav.library_cursor().selected, 1);
    assert_eq!(s.current(), None);
}

#[test]
fn test_search_types_bound_keys() {
    let mut s = Session::new();
    // n, s and j are bindings in Normal mode, here they are text
    s.keys("/nsj");

    match s.app.nav.mode() {
        InputMode::Search(state) => assert_eq!(state.query, "nsj"),
        other => panic!("expected search mode, got {:?}", other),
    }
    assert!(!s.app.player.library.shuffle);
    assert_eq!(s.current(), None);
}

#[test]
fn test_search_escape_keeps_selection() {
    let mut s = Session::new();
    s.keys("jj/gam");
    s.key(KeyCode::Esc);

    assert_eq!(s.app.nav.mode(), &InputMode::Normal);
    assert_eq!(s.app.nav.library_cursor().selected, 2);
}

#[test]
fn test_search_single_char_quit_binding_leaves_search() {
    let mut s = Session::new();
    s.app.player.config.keybindings.set(Action::Quit, vec![KeySpec::parse("x")]);
    s.keys("jj/ga");
    s.keys("x");

    assert_eq!(s.app.nav.mode(), &InputMode::Normal);
    assert_eq!(s.app.nav.library_cursor().selected, 2);
}

#[test]
fn test_search_backspace_on_empty_query_exits() {
    let mut s = Session::new();
    s.keys("/a");
    s.key(KeyCode::Backspace);
    assert!(matches!(s.app.nav.mode(), InputMode::Search(_)));

    s.key(KeyCode::Backspace);
    assert_eq!(s.app.nav.mode(), &InputMode::Normal);
}

#[test]
fn test_search_is_disabled_in_album_view() {
    let mut s = Session::new();
    s.keys("2/");
    assert_eq!(s.app.nav.view(), View::Albums);
    assert_eq!(s.app.nav.mode(), &InputMode::Normal);
}

#[test]
fn test_queue_outranks_playlist_when_track_ends() {
    let mut s = Session::new();
    s.keys("jjje");
    assert_eq!(s.status(), Some("Added to queue: delta"));

    s.keys("kkk");
    s.key(KeyCode::Enter);
    assert_eq!(s.current(), Some(s.track(0)));

    s.mixer.finish();
    s.app.advance();
    assert_eq!(s.current(), Some(s.track(3)));
    assert_eq!(s.app.nav.library_cursor().selected, 3);
    assert_eq!(s.app.player.library.queue().cursor(), 1);
}

#[test]
fn test_repeat_restarts_finished_track() {
    let mut s = Session::new();
    s.keys("r");
    assert_eq!(s.status(), Some("Repeat: ON"));

    s.key(KeyCode::Enter);
    s.clock.advance(179.0);
    s.mixer.finish();
    s.app.advance();

    assert_eq!(s.current(), Some(s.track(0)));
    assert_eq!(s.app.player.engine.position(), 0.0);
    assert_eq!(s.mixer.state().started_at, Some(Duration::ZERO));
}

#[test]
fn test_last_track_wraps_to_first() {
    let mut s = Session::new();
    s.keys("jjj");
    s.key(KeyCode::Enter);
    s.mixer.finish();
    s.app.advance();
    assert_eq!(s.current(), Some(s.track(0)));
}

#[test]
fn test_next_and_prev_follow_playlist() {
    let mut s = Session::new();
    s.keys("n");
    assert_eq!(s.current(), Some(s.track(0)));
    s.keys("n");
    assert_eq!(s.current(), Some(s.track(1)));
    s.keys("pp");
    assert_eq!(s.current(), Some(s.track(3)));
    assert_eq!(s.app.nav.library_cursor().selected, 3);
}

#[test]
fn test_play_pause_toggle() {
    let mut s = Session::new();
    s.keys("jc");
    assert_eq!(s.current(), Some(s.track(1)));

    s.clock.advance(12.0);
    s.keys("c");
    assert_eq!(s.app.player.engine.state(), PlaybackState::Paused);
    s.clock.advance(30.0);
    s.keys("c");
    assert_eq!(s.app.player.engine.state(), PlaybackState::Playing);
    assert_eq!(s.app.player.engine.position(), 12.0);
}

#[test]
fn test_seek_reports_and_moves() {
    let mut s = Session::new();
    s.key(KeyCode::Enter);
    s.clock.advance(10.0);

    s.key(KeyCode::Right);
    assert_eq!(s.status(), Some("Seeked forward 5s"));
    assert_eq!(s.app.player.engine.position(), 15.0);

    s.key(KeyCode::Left);
    assert_eq!(s.status(), Some("Seeked backward 5s"));
    assert_eq!(s.app.player.engine.position(), 10.0);
}

#[test]
fn test_seek_keys_navigate_in_album_view() {
    let mut s = Session::new();
    s.key(KeyCode::Enter);
    s.keys("2");
    s.key(KeyCode::Right);

    assert_eq!(s.app.nav.album_focus(), AlbumFocus::SongList);
    assert_eq!(s.app.player.status.current(), None);

    s.key(KeyCode::Left);
    assert_eq!(s.app.nav.album_focus(), AlbumFocus::AlbumList);
}

#[test]
fn test_volume_is_clamped_and_reported() {
    let mut s = Session::new();
    s.keys("+");
    assert_eq!(s.status(), Some("Volume: 100%"));
    s.keys("--");
    assert_eq!(s.status(), Some("Volume: 90%"));
}

#[test]
fn test_album_enqueue_reports_new_songs_only() {
    let mut s = Session::new();
    s.keys("2je");
    assert_eq!(s.status(), Some("Added 2 songs from 'Rock' to queue"));
    s.keys("e");
    assert_eq!(s.status(), Some("All songs from album already in queue"));
    assert_eq!(s.app.player.library.queue().len(), 2);
}

#[test]
fn test_album_song_plays_and_library_follows() {
    let mut s = Session::new();
    s.keys("2j");
    s.key(KeyCode::Enter);
    assert_eq!(s.app.nav.album_focus(), AlbumFocus::SongList);

    s.keys("j");
    s.key(KeyCode::Enter);
    assert_eq!(s.current(), Some(s.track(2)));
    assert_eq!(s.app.nav.library_cursor().selected, 2);

    // moving the album cursor resets the song cursor
    s.keys("hk");
    assert_eq!(s.app.nav.album_cursor().selected, 0);
    assert_eq!(s.app.nav.album_song_cursor().selected, 0);
}

#[test]
fn test_view_switch_keeps_cursors() {
    let mut s = Session::new();
    s.keys("jj3");
    assert_eq!(s.app.nav.view(), View::Queue);
    s.keys("1");
    assert_eq!(s.app.nav.view(), View::Library);
    assert_eq!(s.app.nav.library_cursor().selected, 2);
}

#[test]
fn test_queue_view_play_and_delete() {
    let mut s = Session::new();
    s.keys("jee3j");
    assert_eq!(s.app.player.library.queue().len(), 2);

    s.key(KeyCode::Enter);
    assert_eq!(s.current(), Some(s.track(2)));
    assert_eq!(s.app.player.library.queue().cursor(), 2);

    s.keys("d");
    assert_eq!(s.status(), Some("Removed: beta"));
    assert_eq!(s.app.player.library.queue().len(), 1);
    assert_eq!(s.app.player.library.queue().cursor(), 1);
    assert_eq!(s.app.nav.queue_cursor().selected, 0);
}

#[test]
fn test_remove_and_clear_commands() {
    let mut s = Session::new();
    s.keys("jee");

    s.command(":r 5");
    assert_eq!(s.status(), Some("Invalid queue index"));
    s.command(":remove 1");
    assert_eq!(s.status(), Some("Removed: alpha"));
    s.command(":c");
    assert_eq!(s.status(), Some("Cleared 1 songs from queue"));
    assert!(s.app.player.library.queue().is_empty());
}

#[test]
fn test_unknown_command() {
    let mut s = Session::new();
    s.command(":zap");
    let message = s.app.player.status.current().unwrap();
    assert_eq!(message.text, "Unknown command: :zap");
    assert_eq!(message.kind, StatusKind::Error);
}

#[test]
fn test_command_escape_discards_buffer() {
    let mut s = Session::new();
    s.keys(":cl");
    s.key(KeyCode::Esc);
    assert_eq!(s.app.nav.mode(), &InputMode::Normal);
    assert_eq!(s.status(), None);
}

#[test]
fn test_add_folder() {
    let mut s = Session::new();
    s.command(":add /definitely/not/here");
    assert_eq!(s.status(), Some("Folder not found"));

    let other = s.dir.path().join("other");
    fs::create_dir_all(&other).unwrap();
    fs::write(other.join("solo.flac"), b"x").unwrap();

    s.command(&format!(":add {}", other.display()));
    assert_eq!(s.status(), Some("Loaded 1 tracks from folder"));
    assert_eq!(s.app.player.library.playlist().len(), 1);

    let saved = Config::load_from(&s.config_path());
    assert_eq!(saved.music_root(), other);
}

#[test]
fn test_refresh_command() {
    let mut s = Session::new();
    fs::write(s.dir.path().join("music").join("epsilon.ogg"), b"x").unwrap();
    s.command(":refresh");
    assert_eq!(s.status(), Some("Refreshed library: 5 tracks"));
}

#[test]
fn test_quit_prompt() {
    let mut s = Session::new();
    s.keys("q");
    assert_eq!(s.app.nav.mode(), &InputMode::QuitConfirm);
    assert_eq!(s.app.snapshot(10).prompt.unwrap().text(), "Quit wmus? (y/n)");

    assert_eq!(s.keys("x"), KeyOutcome::Continue);
    assert_eq!(s.app.nav.mode(), &InputMode::Normal);

    s.keys("-s");
    assert_eq!(s.keys("qy"), KeyOutcome::Quit);

    let saved = Config::load_from(&s.config_path());
    assert!((saved.volume - 0.95).abs() < 1e-6);
    assert!(saved.shuffle);
}

#[test]
fn test_ctrl_c_asks_before_quitting() {
    let mut s = Session::new();
    let outcome = s
        .app
        .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(outcome, KeyOutcome::Continue);
    assert_eq!(s.app.nav.mode(), &InputMode::QuitConfirm);
    assert_eq!(s.current(), None);
}

#[test]
fn test_command_quit_is_immediate() {
    let mut s = Session::new();
    assert_eq!(s.command(":q"), KeyOutcome::Quit);
}

#[test]
fn test_help_overlay_swallows_keys() {
    let mut s = Session::new();
    s.command(":help");
    assert_eq!(s.app.nav.overlay(), Some(Overlay::Help { scroll: 0 }));

    s.keys("jjn");
    assert_eq!(s.app.nav.overlay(), Some(Overlay::Help { scroll: 2 }));
    assert_eq!(s.current(), None);

    s.keys("q");
    assert_eq!(s.app.nav.overlay(), None);
    assert_eq!(s.app.nav.mode(), &InputMode::Normal);
}

#[test]
fn test_version_overlay_closes_on_any_key() {
    let mut s = Session::new();
    s.command(":version");
    assert_eq!(s.app.nav.overlay(), Some(Overlay::Version));
    s.keys("z");
    assert_eq!(s.app.nav.overlay(), None);
}

#[test]
fn test_fade_out_stops_without_advancing() {
    let mut s = Session::new();
    s.key(KeyCode::Enter);
    s.keys("f");
    assert_eq!(s.status(), Some("Fading out..."));

    s.app.advance();
    assert_eq!(s.app.player.engine.state(), PlaybackState::Stopped);
    assert_eq!(s.current(), Some(s.track(0)));
}
