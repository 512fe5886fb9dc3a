//! Key-to-action mapping.
//!
//! Bindings are declared as human-readable key chords ("Ctrl+c", "Shift+Tab",
//! "g") and compiled into a lookup table once at startup.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::tui::action::Action;

/// Default chords. Several keys alias the same action (arrows + vim keys).
const DEFAULT_BINDINGS: &[(&str, Action)] = &[
    ("q", Action::Quit),
    ("Ctrl+c", Action::Quit),
    ("Up", Action::MoveUp),
    ("k", Action::MoveUp),
    ("Down", Action::MoveDown),
    ("j", Action::MoveDown),
    ("Left", Action::MoveLeft),
    ("h", Action::MoveLeft),
    ("Right", Action::MoveRight),
    ("l", Action::MoveRight),
    ("g", Action::GoToTop),
    ("G", Action::GoToBottom),
    ("Tab", Action::NextTab),
    ("r", Action::Refresh),
    ("u", Action::CycleUser),
    ("Enter", Action::Confirm),
    ("Esc", Action::Cancel),
    ("Space", Action::ToggleExpand),
    ("c", Action::CycleRowsPerPage),
    ("f", Action::OpenFilters),
    ("n", Action::NewQuery),
    ("s", Action::ToggleSort),
];

/// A normalized key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }

    /// Parse "Ctrl+c", "Shift+Tab", "G", "Esc", "F5", ...
    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut modifiers = KeyModifiers::empty();
        let parts: Vec<&str> = spec.split('+').collect();
        let (mod_parts, key_part) = parts.split_at(parts.len() - 1);
        for part in mod_parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                other => return Err(format!("unknown modifier '{other}' in '{spec}'")),
            }
        }
        let key = key_part[0];

        let code = match key.to_ascii_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "tab" => KeyCode::Tab,
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            lower => {
                if key.len() == 1 {
                    let ch = key.chars().next().unwrap_or_default();
                    // Bare uppercase letters imply Shift ("G" = Shift+g).
                    if ch.is_ascii_uppercase() {
                        modifiers |= KeyModifiers::SHIFT;
                    }
                    KeyCode::Char(ch.to_ascii_lowercase())
                } else if let Some(n) = lower
                    .strip_prefix('f')
                    .and_then(|rest| rest.parse::<u8>().ok())
                    && (1..=12).contains(&n)
                {
                    KeyCode::F(n)
                } else {
                    return Err(format!("unknown key '{key}' in '{spec}'"));
                }
            }
        };

        Ok(Self { code, modifiers })
    }
}

/// Compiled chord -> action table.
#[derive(Debug, Clone)]
pub struct KeyMap {
    entries: Vec<(String, Action)>,
    table: HashMap<KeyChord, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_BINDINGS
                .iter()
                .map(|(spec, action)| (spec.to_string(), action.clone()))
                .collect(),
        )
    }
}

impl KeyMap {
    fn from_entries(entries: Vec<(String, Action)>) -> Self {
        let table = entries
            .iter()
            .filter_map(|(spec, action)| {
                KeyChord::parse(spec).ok().map(|chord| (chord, action.clone()))
            })
            .collect();
        Self { entries, table }
    }

    /// Resolve a key event to its bound action.
    pub fn lookup(&self, event: &KeyEvent) -> Option<Action> {
        let mut chord = KeyChord::from_event(event);
        // Terminals report "G" as Char('G') + SHIFT; normalize to lowercase.
        if let KeyCode::Char(c) = chord.code {
            chord.code = KeyCode::Char(c.to_ascii_lowercase());
        }
        self.table.get(&chord).cloned()
    }

    /// First chord bound to an action, for footer hints.
    pub fn key_for(&self, action: &Action) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, a)| a == action)
            .map(|(spec, _)| spec.as_str())
    }

    /// Every chord spec must parse and every bindable action should be
    /// reachable; returns human-readable problems.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (spec, action) in &self.entries {
            if let Err(err) = KeyChord::parse(spec) {
                problems.push(format!("{action}: {err}"));
            }
        }
        for action in Action::bindable() {
            if !self.entries.iter().any(|(_, a)| *a == action) {
                problems.push(format!("no key bound to {action}"));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_modified_chords() {
        assert_eq!(
            KeyChord::parse("Ctrl+c").unwrap(),
            KeyChord {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL
            }
        );
        assert_eq!(KeyChord::parse("Esc").unwrap().code, KeyCode::Esc);
        assert_eq!(KeyChord::parse("F5").unwrap().code, KeyCode::F(5));
        assert!(KeyChord::parse("Hyper+x").is_err());
        assert!(KeyChord::parse("F13").is_err());
    }

    #[test]
    fn test_uppercase_letter_implies_shift() {
        let chord = KeyChord::parse("G").unwrap();
        assert_eq!(chord.code, KeyCode::Char('g'));
        assert!(chord.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn test_default_map_is_valid() {
        assert_eq!(KeyMap::default().validate(), Vec::<String>::new());
    }

    #[test]
    fn test_lookup_resolves_aliases() {
        let map = KeyMap::default();
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(map.lookup(&down), Some(Action::MoveDown));
        assert_eq!(map.lookup(&j), Some(Action::MoveDown));
    }

    #[test]
    fn test_lookup_normalizes_shifted_letters() {
        let map = KeyMap::default();
        let shift_g = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(map.lookup(&shift_g), Some(Action::GoToBottom));
    }

    #[test]
    fn test_unbound_key_yields_nothing() {
        let map = KeyMap::default();
        let key = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(map.lookup(&key), None);
    }

    #[test]
    fn test_key_for_hints() {
        let map = KeyMap::default();
        assert_eq!(map.key_for(&Action::OpenFilters), Some("f"));
        assert_eq!(map.key_for(&Action::MoveUp), Some("Up"));
    }
}
