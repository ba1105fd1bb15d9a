//! Keymap: the flat table that maps key presses to navigation-mode actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Everything a key can trigger while navigating the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    InsertColumn,
    InsertRow,
    Edit,
    DeleteRow,
    DeleteColumn,
    ClearCell,
    Copy,
    Cut,
    Paste,
    Save,
    Quit,
    Magnify,
    Help,
}

impl Action {
    pub const ALL: [Action; 17] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::InsertColumn,
        Action::InsertRow,
        Action::Edit,
        Action::DeleteRow,
        Action::DeleteColumn,
        Action::ClearCell,
        Action::Copy,
        Action::Cut,
        Action::Paste,
        Action::Save,
        Action::Quit,
        Action::Magnify,
        Action::Help,
    ];

    /// Name used in `settings.toml` `[keys]`.
    pub fn name(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::InsertColumn => "insert_column",
            Action::InsertRow => "insert_row",
            Action::Edit => "edit",
            Action::DeleteRow => "delete_row",
            Action::DeleteColumn => "delete_column",
            Action::ClearCell => "clear_cell",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste => "paste",
            Action::Save => "save",
            Action::Quit => "quit",
            Action::Magnify => "magnify",
            Action::Help => "help",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::MoveUp => "Move selection up",
            Action::MoveDown => "Move selection down",
            Action::MoveLeft => "Move selection left",
            Action::MoveRight => "Move selection right",
            Action::InsertColumn => "Insert column after selection",
            Action::InsertRow => "Insert row below selection",
            Action::Edit => "Edit selected cell",
            Action::DeleteRow => "Archive and delete selected row",
            Action::DeleteColumn => "Delete selected column",
            Action::ClearCell => "Clear selected cell",
            Action::Copy => "Copy cell",
            Action::Cut => "Cut cell",
            Action::Paste => "Paste into cell",
            Action::Save => "Save file",
            Action::Quit => "Save and quit",
            Action::Magnify => "Show full cell content",
            Action::Help => "Show this help",
        }
    }
}

const DEFAULT_BINDINGS: &[(&str, Action)] = &[
    ("Up", Action::MoveUp),
    ("Down", Action::MoveDown),
    ("Left", Action::MoveLeft),
    ("Right", Action::MoveRight),
    ("Tab", Action::InsertColumn),
    ("Enter", Action::InsertRow),
    ("E", Action::Edit),
    ("I", Action::Edit),
    ("D", Action::DeleteRow),
    ("Backspace", Action::DeleteColumn),
    ("N", Action::ClearCell),
    ("C", Action::Copy),
    ("X", Action::Cut),
    ("V", Action::Paste),
    ("Ctrl+S", Action::Save),
    ("Q", Action::Quit),
    ("Esc", Action::Quit),
    ("M", Action::Magnify),
    ("F1", Action::Help),
];

/// Key string -> action lookup, built from defaults plus user overrides.
pub struct Keymap {
    bindings: Vec<(String, Action)>,
    by_key: HashMap<String, Action>,
}

impl Keymap {
    /// Defaults with `overrides` (action name -> key) applied. An override replaces every
    /// default key of that action.
    pub fn new(overrides: &HashMap<String, String>) -> Self {
        let mut bindings: Vec<(String, Action)> =
            DEFAULT_BINDINGS.iter().map(|(k, a)| ((*k).to_string(), *a)).collect();

        let mut names: Vec<&String> = overrides.keys().collect();
        names.sort();
        for name in names {
            let key = overrides[name].trim();
            let Some(action) = Action::from_name(name) else {
                tracing::warn!("Unknown action in [keys]: '{name}'");
                continue;
            };
            if key.is_empty() {
                tracing::warn!("Empty key for action '{name}'");
                continue;
            }
            bindings.retain(|(_, a)| *a != action);
            bindings.retain(|(k, _)| k != key);
            bindings.push((key.to_string(), action));
        }

        let by_key = bindings.iter().map(|(k, a)| (k.clone(), *a)).collect();
        Self { bindings, by_key }
    }

    /// Resolve a key press to an action.
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        self.by_key.get(&canonical_key_string(key)).copied()
    }

    /// Bindings in display order (for the help screen).
    pub fn bindings(&self) -> &[(String, Action)] {
        &self.bindings
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

/// Convert a crossterm `KeyEvent` into a canonical string like `"Ctrl+S"`.
///
/// Canonical ordering: Ctrl, Alt, Shift + Key
pub fn canonical_key_string(key: &KeyEvent) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }

    let key_name = match key.code {
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "BackTab".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => format!("{:?}", key.code),
    };

    if parts.is_empty() {
        key_name
    } else {
        parts.push(&key_name);
        parts.join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn canonical_strings() {
        assert_eq!(canonical_key_string(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)), "Ctrl+S");
        assert_eq!(canonical_key_string(&key(KeyCode::Char('d'), KeyModifiers::NONE)), "D");
        assert_eq!(canonical_key_string(&key(KeyCode::Char('D'), KeyModifiers::SHIFT)), "Shift+D");
        assert_eq!(canonical_key_string(&key(KeyCode::F(1), KeyModifiers::NONE)), "F1");
        assert_eq!(canonical_key_string(&key(KeyCode::Tab, KeyModifiers::NONE)), "Tab");
    }

    #[test]
    fn default_bindings_resolve() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyCode::Char('d'), KeyModifiers::NONE)), Some(Action::DeleteRow));
        assert_eq!(km.resolve(&key(KeyCode::Char('e'), KeyModifiers::NONE)), Some(Action::Edit));
        assert_eq!(km.resolve(&key(KeyCode::Char('i'), KeyModifiers::NONE)), Some(Action::Edit));
        assert_eq!(km.resolve(&key(KeyCode::Esc, KeyModifiers::NONE)), Some(Action::Quit));
        assert_eq!(km.resolve(&key(KeyCode::Backspace, KeyModifiers::NONE)), Some(Action::DeleteColumn));
        assert_eq!(km.resolve(&key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
        assert_eq!(km.resolve(&key(KeyCode::Char('d'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn every_action_has_a_default_key() {
        let km = Keymap::default();
        for action in Action::ALL {
            assert!(km.bindings().iter().any(|(_, a)| *a == action), "{action:?} unbound");
        }
    }

    #[test]
    fn override_replaces_defaults() {
        let mut o = HashMap::new();
        o.insert("delete_row".to_string(), "Ctrl+D".to_string());
        o.insert("no_such_action".to_string(), "F5".to_string());
        let km = Keymap::new(&o);
        assert_eq!(km.resolve(&key(KeyCode::Char('d'), KeyModifiers::NONE)), None);
        assert_eq!(km.resolve(&key(KeyCode::Char('d'), KeyModifiers::CONTROL)), Some(Action::DeleteRow));
        assert_eq!(km.resolve(&key(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn override_steals_key_from_other_action() {
        let mut o = HashMap::new();
        o.insert("save".to_string(), "Q".to_string());
        let km = Keymap::new(&o);
        assert_eq!(km.resolve(&key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(Action::Save));
        assert_eq!(km.resolve(&key(KeyCode::Esc, KeyModifiers::NONE)), Some(Action::Quit));
    }

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name(" Delete_Row "), Some(Action::DeleteRow));
    }
}
