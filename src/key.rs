//! Key bindings for the countdown widget.
//!
//! A [`Binding`] groups one or more key presses under a single action and
//! carries the help text shown by the [`help`](crate::help) view.
//!
//! ```rust
//! use bubbletea_countdown::key::Binding;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let start = Binding::new(vec![KeyCode::Char('s'), KeyCode::Char(' ')])
//!     .with_help("s", "start");
//! let quit = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)])
//!     .with_help("ctrl+c", "quit");
//! assert!(start.enabled());
//! assert_eq!(quit.help().key, "ctrl+c");
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a key code plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifiers held while pressing it.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    fn matches(&self, msg: &KeyMsg) -> bool {
        // Shift is folded into the character itself for printable keys.
        let held = msg.modifiers.difference(KeyModifiers::SHIFT);
        let wanted = self.modifiers.difference(KeyModifiers::SHIFT);
        self.code == msg.key && held == wanted
    }
}

/// Help text for a binding: the key label and a short description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Key label, e.g. `"enter"`.
    pub key: String,
    /// What the key does, e.g. `"set"`.
    pub desc: String,
}

/// A set of key presses bound to one action.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from anything convertible into key presses.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help label and description.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns the key presses of this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Returns the help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding is active. A binding without keys is never enabled.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Reports whether the key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Reports whether `msg` triggers any of the given bindings.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}
