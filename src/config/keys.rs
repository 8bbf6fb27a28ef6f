// Key bindings: each action maps to a list of key specs
// A spec is a key code, a named special key, or a text token typed at the ':' prompt

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Quit,
    Search,
    Next,
    Prev,
    PlayPause,
    Down,
    Up,
    Enter,
    Shuffle,
    Repeat,
    VolumeUp,
    VolumeDown,
    Fadeout,
    Queue,
    SeekForward,
    SeekBackward,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::Quit,
        Action::Search,
        Action::Next,
        Action::Prev,
        Action::PlayPause,
        Action::Down,
        Action::Up,
        Action::Enter,
        Action::Shuffle,
        Action::Repeat,
        Action::VolumeUp,
        Action::VolumeDown,
        Action::Fadeout,
        Action::Queue,
        Action::SeekForward,
        Action::SeekBackward,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::Search => "search",
            Action::Next => "next",
            Action::Prev => "prev",
            Action::PlayPause => "play_pause",
            Action::Down => "down",
            Action::Up => "up",
            Action::Enter => "enter",
            Action::Shuffle => "shuffle",
            Action::Repeat => "repeat",
            Action::VolumeUp => "volume_up",
            Action::VolumeDown => "volume_down",
            Action::Fadeout => "fadeout",
            Action::Queue => "queue",
            Action::SeekForward => "seek_forward",
            Action::SeekBackward => "seek_backward",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|action| action.name() == name)
    }

    fn default_keys(&self) -> Vec<KeySpec> {
        let keys: &[&str] = match self {
            Action::Quit => &[":q"],
            Action::Search => &["/"],
            Action::Next => &["n"],
            Action::Prev => &["p"],
            Action::PlayPause => &["c"],
            Action::Down => &["KEY_DOWN", "j"],
            Action::Up => &["KEY_UP", "k"],
            Action::Enter => &["KEY_ENTER"],
            Action::Shuffle => &["s"],
            Action::Repeat => &["r"],
            Action::VolumeUp => &["+", "="],
            Action::VolumeDown => &["-"],
            Action::Fadeout => &["f"],
            Action::Queue => &["e"],
            Action::SeekForward => &["KEY_RIGHT"],
            Action::SeekBackward => &["KEY_LEFT"],
        };
        let mut specs: Vec<KeySpec> = keys.iter().map(|k| KeySpec::parse(k)).collect();
        if *self == Action::Enter {
            specs.push(KeySpec::Literal(10));
            specs.push(KeySpec::Literal(13));
        }
        specs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawKey", into = "RawKey")]
pub enum KeySpec {
    /// A character or control code, e.g. `"j"` or `13`.
    Literal(u32),
    /// A special key such as `KEY_UP` or `KEY_F5`.
    Named(String),
    /// A multi-character word like `:q`, only matched against the command buffer.
    TextToken(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawKey {
    Code(u32),
    Text(String),
}

impl From<RawKey> for KeySpec {
    fn from(raw: RawKey) -> Self {
        match raw {
            RawKey::Code(code) => KeySpec::Literal(code),
            RawKey::Text(text) => KeySpec::parse(&text),
        }
    }
}

impl From<KeySpec> for RawKey {
    fn from(spec: KeySpec) -> Self {
        match spec {
            KeySpec::Literal(code) if (32..=126).contains(&code) => match char::from_u32(code) {
                Some(c) => RawKey::Text(c.to_string()),
                None => RawKey::Code(code),
            },
            KeySpec::Literal(code) => RawKey::Code(code),
            KeySpec::Named(name) => RawKey::Text(name),
            KeySpec::TextToken(token) => RawKey::Text(token),
        }
    }
}

impl KeySpec {
    pub fn parse(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeySpec::Literal(c as u32),
            _ if text.starts_with("KEY_") => KeySpec::Named(text.to_string()),
            _ => KeySpec::TextToken(text.to_string()),
        }
    }

    /// `buffer` is the text typed at the command prompt, if one is open.
    pub fn matches(&self, key: &KeyEvent, buffer: Option<&str>) -> bool {
        match self {
            KeySpec::Literal(code) => literal_matches(*code, key),
            KeySpec::Named(name) => named_key_code(name).map_or(false, |code| code == key.code),
            KeySpec::TextToken(token) => buffer.map_or(false, |typed| typed == token),
        }
    }

    /// How the help screen shows this key.
    pub fn label(&self) -> String {
        match self {
            KeySpec::Literal(32) => "Space".to_string(),
            KeySpec::Literal(code) if (33..=126).contains(code) => char::from_u32(*code)
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_else(|| code.to_string()),
            KeySpec::Literal(code) => code.to_string(),
            KeySpec::Named(name) => {
                let short = name.trim_start_matches("KEY_").replace('_', "");
                match short.to_uppercase().as_str() {
                    "ENTER" => "Enter".to_string(),
                    "UP" => "Up".to_string(),
                    "DOWN" => "Down".to_string(),
                    "LEFT" => "Left".to_string(),
                    "RIGHT" => "Right".to_string(),
                    _ => title_case(&short),
                }
            }
            KeySpec::TextToken(token) if token.starts_with(':') => token.clone(),
            KeySpec::TextToken(token) => token.to_uppercase(),
        }
    }
}

fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn literal_matches(code: u32, key: &KeyEvent) -> bool {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }
    match key.code {
        KeyCode::Char(c) => c as u32 == code,
        KeyCode::Enter => code == 10 || code == 13,
        KeyCode::Tab => code == 9,
        KeyCode::Esc => code == 27,
        KeyCode::Backspace => code == 8 || code == 127,
        _ => false,
    }
}

fn named_key_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "KEY_UP" => KeyCode::Up,
        "KEY_DOWN" => KeyCode::Down,
        "KEY_LEFT" => KeyCode::Left,
        "KEY_RIGHT" => KeyCode::Right,
        "KEY_ENTER" => KeyCode::Enter,
        "KEY_BACKSPACE" => KeyCode::Backspace,
        "KEY_DC" => KeyCode::Delete,
        "KEY_IC" => KeyCode::Insert,
        "KEY_HOME" => KeyCode::Home,
        "KEY_END" => KeyCode::End,
        "KEY_NPAGE" => KeyCode::PageDown,
        "KEY_PPAGE" => KeyCode::PageUp,
        "KEY_BTAB" => KeyCode::BackTab,
        other => {
            let number = other.strip_prefix("KEY_F")?.parse::<u8>().ok()?;
            KeyCode::F(number)
        }
    };
    Some(code)
}

type RawBindings = BTreeMap<String, Vec<KeySpec>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBindings", into = "RawBindings")]
pub struct KeyBindings {
    bindings: BTreeMap<Action, Vec<KeySpec>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: Action::ALL
                .iter()
                .map(|action| (*action, action.default_keys()))
                .collect(),
        }
    }
}

// Unknown action names are dropped, missing ones keep their defaults
impl From<RawBindings> for KeyBindings {
    fn from(raw: RawBindings) -> Self {
        let mut bindings = KeyBindings::default();
        for (name, keys) in raw {
            if let Some(action) = Action::from_name(&name) {
                bindings.set(action, keys);
            }
        }
        bindings
    }
}

impl From<KeyBindings> for RawBindings {
    fn from(bindings: KeyBindings) -> Self {
        bindings
            .bindings
            .into_iter()
            .map(|(action, keys)| (action.name().to_string(), keys))
            .collect()
    }
}

impl KeyBindings {
    pub fn keys(&self, action: Action) -> &[KeySpec] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set(&mut self, action: Action, keys: Vec<KeySpec>) {
        self.bindings.insert(action, keys);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.keys(action).iter().any(|spec| spec.matches(key, None))
    }

    /// Whether a completed command buffer is one of the action's text tokens.
    pub fn matches_text(&self, action: Action, buffer: &str) -> bool {
        self.keys(action).iter().any(|spec| match spec {
            KeySpec::TextToken(token) => token == buffer,
            _ => false,
        })
    }
}
