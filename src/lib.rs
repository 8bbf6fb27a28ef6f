// wmus library - everything the binary wires together
// Core (engine, library, search, navigation) runs without a terminal or sound card

pub mod audio;   // tags, scanning, mixer, playback engine
pub mod config;  // config document and key bindings
pub mod context; // on-disk locations
pub mod error;   // error taxonomy
pub mod library; // playlist, albums, queue, metadata cache
pub mod player;  // session operations behind the keys
pub mod search;  // query ranking
pub mod ui;      // navigation, snapshot, terminal

pub use audio::{PlaybackEngine, PlaybackState, Track};
pub use config::{Action, Config, KeyBindings, KeySpec};
pub use context::AppContext;
pub use error::{PlayerError, PlayerResult, StatusKind};
pub use library::{Direction, LibraryModel, MetadataCache, Queue};
pub use player::Player;
