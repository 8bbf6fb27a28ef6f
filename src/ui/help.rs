use crate::config::{Action, KeyBindings};

const SECTIONS: &[(&str, &[Action])] = &[
    ("Navigation", &[Action::Up, Action::Down, Action::Enter]),
    (
        "Playback",
        &[
            Action::PlayPause,
            Action::Next,
            Action::Prev,
            Action::SeekForward,
            Action::SeekBackward,
        ],
    ),
    ("Audio", &[Action::VolumeUp, Action::VolumeDown, Action::Fadeout]),
    ("Library", &[Action::Search, Action::Shuffle, Action::Repeat, Action::Queue]),
    ("System", &[Action::Quit]),
];

const REFERENCE: &[(&str, &[&str])] = &[
    (
        "COMMANDS",
        &[
            ":add <folder>     Set or change music library folder",
            ":a <folder>       (alias for :add)",
            ":refresh          Rescan library and rebuild cache",
            ":clear            Clear the playback queue",
            ":c                (alias for :clear)",
            ":remove <n>       Remove track #n from queue",
            ":r <n>            (alias for :remove)",
            ":q                Quit wmus",
            ":v, :version      Display version information",
            ":help             Show this help screen",
            ":h                (alias for :help)",
        ],
    ),
    (
        "VIEW MODES",
        &[
            "Press 1           Library view (all tracks)",
            "Press 2           Album view (organized by album)",
            "Press 3           Queue view (upcoming tracks)",
        ],
    ),
    (
        "ALBUM VIEW",
        &[
            "* Use Left/Right, h/l, or Tab to switch columns",
            "* Press Enter on album to view songs",
            "* Press the queue key on album to queue entire album",
            "* Press the queue key on song to queue individual track",
        ],
    ),
    (
        "QUEUE MANAGEMENT",
        &[
            "* Press the queue key to add tracks to queue",
            "* Press 'd' or Delete to remove from queue (in Queue view)",
            "* Use :clear or :c to clear entire queue",
            "* Use :remove N or :r N to remove track #N",
        ],
    ),
    (
        "TIPS",
        &[
            "* Search filters as you type (press Esc to cancel)",
            "* Queue tracks play after current song finishes",
            "* Press 'q' for quit prompt, ':q' for immediate quit",
            "* Volume, shuffle, and repeat states are saved on exit",
        ],
    ),
];

fn describe(action: Action) -> &'static str {
    match action {
        Action::Up => "Navigate up in list",
        Action::Down => "Navigate down in list",
        Action::Enter => "Play selected track",
        Action::PlayPause => "Toggle play/pause",
        Action::Next => "Skip to next track",
        Action::Prev => "Go to previous track",
        Action::Shuffle => "Toggle shuffle mode",
        Action::Repeat => "Toggle repeat mode",
        Action::Search => "Search library (type to filter)",
        Action::Quit => "Quit application",
        Action::VolumeUp => "Increase volume by 5%",
        Action::VolumeDown => "Decrease volume by 5%",
        Action::Fadeout => "Fade out current track",
        Action::Queue => "Add selected track to queue",
        Action::SeekForward => "Seek forward",
        Action::SeekBackward => "Seek backward",
    }
}

/// The help screen, built from the bindings actually in effect.
pub fn help_lines(bindings: &KeyBindings) -> Vec<String> {
    let rule = "=".repeat(60);
    let thin = "-".repeat(60);

    let mut lines = vec![
        rule.clone(),
        "           WMUS - TERMINAL MUSIC PLAYER HELP".to_string(),
        rule.clone(),
        String::new(),
    ];

    for (section, actions) in SECTIONS {
        lines.push(thin.clone());
        lines.push(format!(" {}", section.to_uppercase()));
        lines.push(thin.clone());

        for action in *actions {
            let keys: Vec<String> = bindings.keys(*action).iter().take(3).map(|k| k.label()).collect();
            if keys.is_empty() {
                continue;
            }
            lines.push(format!("  {:<15} {}", keys.join("/"), describe(*action)));
        }
        lines.push(String::new());
    }

    for (title, entries) in REFERENCE {
        lines.push(rule.clone());
        lines.push(format!("{}:", title));
        lines.push(rule.clone());
        lines.extend(entries.iter().map(|entry| entry.to_string()));
        lines.push(String::new());
    }

    lines
}

pub fn version_text() -> String {
    format!("wmus v{} - Press any key to continue", env!("CARGO_PKG_VERSION"))
}
