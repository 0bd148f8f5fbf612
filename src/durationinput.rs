//! Numeric duration field.
//!
//! A single-line text input that only accepts characters that can appear in a
//! decimal number. The raw text is kept as typed; [`Model::duration`] parses it
//! with [`parse_duration`] when the owner wants a value.
//!
//! ```rust
//! use bubbletea_countdown::durationinput::new;
//! use bubbletea_countdown::Component;
//!
//! let mut input = new();
//! input.focus();
//! input.set_value("90");
//! assert_eq!(input.duration(), Some(90));
//! ```

use crate::countdown::parse_duration;
use crate::key::Binding;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::Color;
use lipgloss_extras::prelude::*;

const DEFAULT_CHAR_LIMIT: usize = 10;

/// Key bindings for editing the field.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Move the cursor one character left.
    pub character_backward: Binding,
    /// Move the cursor one character right.
    pub character_forward: Binding,
    /// Delete the character before the cursor.
    pub delete_character_backward: Binding,
    /// Delete the character under the cursor.
    pub delete_character_forward: Binding,
    /// Delete everything before the cursor.
    pub delete_before_cursor: Binding,
    /// Delete everything after the cursor.
    pub delete_after_cursor: Binding,
    /// Jump to the start of the line.
    pub line_start: Binding,
    /// Jump to the end of the line.
    pub line_end: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            character_backward: Binding::new(vec![
                (KeyCode::Left, KeyModifiers::NONE),
                (KeyCode::Char('b'), KeyModifiers::CONTROL),
            ]),
            character_forward: Binding::new(vec![
                (KeyCode::Right, KeyModifiers::NONE),
                (KeyCode::Char('f'), KeyModifiers::CONTROL),
            ]),
            delete_character_backward: Binding::new(vec![
                (KeyCode::Backspace, KeyModifiers::NONE),
                (KeyCode::Char('h'), KeyModifiers::CONTROL),
            ]),
            delete_character_forward: Binding::new(vec![
                (KeyCode::Delete, KeyModifiers::NONE),
                (KeyCode::Char('d'), KeyModifiers::CONTROL),
            ]),
            delete_before_cursor: Binding::new(vec![(KeyCode::Char('u'), KeyModifiers::CONTROL)]),
            delete_after_cursor: Binding::new(vec![(KeyCode::Char('k'), KeyModifiers::CONTROL)]),
            line_start: Binding::new(vec![
                (KeyCode::Home, KeyModifiers::NONE),
                (KeyCode::Char('a'), KeyModifiers::CONTROL),
            ]),
            line_end: Binding::new(vec![
                (KeyCode::End, KeyModifiers::NONE),
                (KeyCode::Char('e'), KeyModifiers::CONTROL),
            ]),
        }
    }
}

/// The duration input model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Text shown before the value.
    pub prompt: String,
    /// Style for the prompt.
    pub prompt_style: Style,
    /// Style for the typed text.
    pub text_style: Style,
    /// Text shown while the value is empty.
    pub placeholder: String,
    /// Style for the placeholder.
    pub placeholder_style: Style,
    /// Style for the cursor cell. Rendered reversed.
    pub cursor_style: Style,
    /// Editing key bindings.
    pub key_map: KeyMap,

    value: Vec<char>,
    pos: usize,
    focus: bool,
    char_limit: usize,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            prompt_style: Style::new(),
            text_style: Style::new(),
            placeholder: "Enter duration in seconds".to_string(),
            placeholder_style: Style::new().foreground(Color::from("240")),
            cursor_style: Style::new(),
            key_map: KeyMap::default(),
            value: Vec::new(),
            pos: 0,
            focus: false,
            char_limit: DEFAULT_CHAR_LIMIT,
        }
    }
}

/// Creates an empty, unfocused duration input.
pub fn new() -> Model {
    Model::default()
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-')
}

impl Model {
    /// Replaces the value. Characters a number cannot contain are dropped and
    /// the result is truncated to the character limit.
    pub fn set_value(&mut self, s: &str) {
        self.value = s
            .chars()
            .filter(|c| is_number_char(*c))
            .take(self.limit())
            .collect();
        self.pos = self.value.len();
    }

    /// Returns the raw text.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Parses the current text as a positive whole number of seconds.
    pub fn duration(&self) -> Option<i64> {
        parse_duration(&self.value())
    }

    /// Returns the cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor, clamped to the end of the text.
    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos.min(self.value.len());
    }

    /// Clears the text.
    pub fn reset(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    /// Sets the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    /// Sets the prompt text.
    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    /// Sets the maximum number of characters. 0 means no limit.
    pub fn set_char_limit(&mut self, limit: usize) {
        self.char_limit = limit;
        if self.value.len() > self.limit() {
            self.value.truncate(self.limit());
            self.pos = self.pos.min(self.value.len());
        }
    }

    fn limit(&self) -> usize {
        if self.char_limit == 0 {
            usize::MAX
        } else {
            self.char_limit
        }
    }

    fn insert(&mut self, ch: char) {
        if !is_number_char(ch) || self.value.len() >= self.limit() {
            return;
        }
        self.value.insert(self.pos, ch);
        self.pos += 1;
    }

    /// Handles editing keys while focused. Never produces a command.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if !self.focus {
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg);
        }
        None
    }

    fn handle_key(&mut self, key_msg: &KeyMsg) {
        let km = &self.key_map;
        if km.delete_character_backward.matches(key_msg) {
            if self.pos > 0 {
                self.pos -= 1;
                self.value.remove(self.pos);
            }
        } else if km.delete_character_forward.matches(key_msg) {
            if self.pos < self.value.len() {
                self.value.remove(self.pos);
            }
        } else if km.delete_before_cursor.matches(key_msg) {
            self.value.drain(..self.pos);
            self.pos = 0;
        } else if km.delete_after_cursor.matches(key_msg) {
            self.value.truncate(self.pos);
        } else if km.character_backward.matches(key_msg) {
            self.pos = self.pos.saturating_sub(1);
        } else if km.character_forward.matches(key_msg) {
            self.set_cursor(self.pos + 1);
        } else if km.line_start.matches(key_msg) {
            self.pos = 0;
        } else if km.line_end.matches(key_msg) {
            self.pos = self.value.len();
        } else if let KeyCode::Char(ch) = key_msg.key {
            if !key_msg.modifiers.contains(KeyModifiers::CONTROL)
                && !key_msg.modifiers.contains(KeyModifiers::ALT)
            {
                self.insert(ch);
            }
        }
    }

    /// Renders the prompt followed by the value, or the placeholder when empty.
    pub fn view(&self) -> String {
        let prompt = self.prompt_style.clone().inline(true).render(&self.prompt);

        if self.value.is_empty() {
            let placeholder = self
                .placeholder_style
                .clone()
                .inline(true)
                .render(&self.placeholder);
            if !self.focus {
                return format!("{}{}", prompt, placeholder);
            }
            return format!("{}{}{}", prompt, self.cursor_view(" "), placeholder);
        }

        let text: String = self.value.iter().collect();
        if !self.focus {
            return format!("{}{}", prompt, self.text_style.clone().inline(true).render(&text));
        }

        let head: String = self.value[..self.pos].iter().collect();
        let (under, tail) = match self.value.get(self.pos) {
            Some(ch) => (ch.to_string(), self.value[self.pos + 1..].iter().collect()),
            None => (" ".to_string(), String::new()),
        };

        format!(
            "{}{}{}{}",
            prompt,
            self.text_style.clone().inline(true).render(&head),
            self.cursor_view(&under),
            self.text_style.clone().inline(true).render(&tail),
        )
    }

    fn cursor_view(&self, ch: &str) -> String {
        self.cursor_style
            .clone()
            .inline(true)
            .reverse(true)
            .render(ch)
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
