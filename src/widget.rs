//! The countdown widget: a duration field, a clock and start/pause/reset controls.
//!
//! The widget composes a [`durationinput`](crate::durationinput) field and a
//! [`countdown`](crate::countdown) engine, maps key presses to engine
//! operations and renders the remaining time as `MM:SS`.
//!
//! # Usage
//!
//! ```rust
//! use bubbletea_countdown::widget;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let mut countdown = widget::new();
//! for code in [KeyCode::Char('9'), KeyCode::Char('0'), KeyCode::Enter] {
//!     countdown.update(Box::new(KeyMsg { key: code, modifiers: KeyModifiers::NONE }));
//! }
//! assert_eq!(countdown.timer.view(), "01:30");
//! ```
//!
//! # Default Key Bindings
//!
//! | Key | Action |
//! |-----|--------|
//! | `enter` | set the duration from the field |
//! | `s` / `space` | start, or resume when paused |
//! | `p` | pause |
//! | `r` | reset to the configured duration |
//! | `?` | toggle the full help |

use crate::countdown::{self, Status, TimeoutMsg};
use crate::durationinput;
use crate::help;
use crate::key::Binding;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use tracing::debug;

/// Key bindings for the widget controls.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Apply the duration typed in the field.
    pub set: Binding,
    /// Start, or resume when paused.
    pub start: Binding,
    /// Pause.
    pub pause: Binding,
    /// Reset to the configured duration.
    pub reset: Binding,
    /// Toggle between the short and full help.
    pub help: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            set: Binding::new(vec![KeyCode::Enter]).with_help("enter", "set"),
            start: Binding::new(vec![KeyCode::Char('s'), KeyCode::Char(' ')])
                .with_help("s", "start/resume"),
            pause: Binding::new(vec![KeyCode::Char('p')]).with_help("p", "pause"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
        }
    }
}

impl help::KeyMap for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.set, &self.start, &self.pause, &self.reset, &self.help]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.set],
            vec![&self.start, &self.pause, &self.reset],
            vec![&self.help],
        ]
    }
}

/// Styles for the widget.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Heading above the field.
    pub title: Style,
    /// Clock while counting or idle.
    pub clock: Style,
    /// Clock once the countdown ran out.
    pub clock_finished: Style,
    /// A control that would act if pressed.
    pub button: Style,
    /// A control that would do nothing if pressed.
    pub button_inactive: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        Self {
            title: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#9D174D",
                Dark: "#F9A8D4",
            }),
            clock: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#9D174D",
                Dark: "#E5E7EB",
            }),
            clock_finished: Style::new().bold(true).foreground(lipgloss::Color::from("#A855F7")),
            button: Style::new().bold(true).foreground(lipgloss::Color::from("#EC4899")),
            button_inactive: Style::new().foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
        }
    }
}

/// The countdown widget model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Duration field.
    pub input: durationinput::Model,
    /// Countdown engine.
    pub timer: countdown::Model,
    /// Help line.
    pub help: help::Model,
    /// Control bindings.
    pub key_map: KeyMap,
    /// Styles.
    pub styles: Styles,

    title: String,
}

impl Default for Model {
    fn default() -> Self {
        let mut input = durationinput::new();
        input.focus();
        Self {
            input,
            timer: countdown::Model::new(),
            help: help::Model::new(),
            key_map: KeyMap::default(),
            styles: Styles::default(),
            title: "Countdown Timer".to_string(),
        }
    }
}

/// Creates a widget with the duration field focused and no duration set.
pub fn new() -> Model {
    Model::default()
}

impl Model {
    /// Replaces the control bindings.
    pub fn with_key_map(mut self, key_map: KeyMap) -> Self {
        self.key_map = key_map;
        self
    }

    /// Replaces the styles.
    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Replaces the heading.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns the heading.
    pub fn title(&self) -> &str {
        &self.title
    }

    fn handle_key(&mut self, key_msg: &KeyMsg) -> Option<Option<Cmd>> {
        if self.key_map.set.matches(key_msg) {
            self.timer.set_duration_input(&self.input.value());
            return Some(None);
        }
        if self.key_map.start.matches(key_msg) {
            return Some(self.timer.start());
        }
        if self.key_map.pause.matches(key_msg) {
            self.timer.pause();
            return Some(None);
        }
        if self.key_map.reset.matches(key_msg) {
            self.timer.reset();
            return Some(None);
        }
        if self.key_map.help.matches(key_msg) {
            self.help.show_all = !self.help.show_all;
            return Some(None);
        }
        None
    }

    /// Routes key presses to the controls or the field, and everything else to
    /// the engine.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if let Some(cmd) = self.handle_key(key_msg) {
                return cmd;
            }
            return self.input.update(&msg);
        }

        if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
            if timeout.id == self.timer.id() {
                debug!(id = timeout.id, "countdown finished");
            }
            return None;
        }

        self.timer.update(msg)
    }

    fn button(&self, label: &str, active: bool) -> String {
        let style = if active {
            &self.styles.button
        } else {
            &self.styles.button_inactive
        };
        style.clone().inline(true).render(&format!("[ {} ]", label))
    }

    /// Whether pressing start would change anything.
    pub fn can_start(&self) -> bool {
        self.timer.remaining() > 0 && self.timer.status() != Status::Running
    }

    /// Whether pressing pause would change anything.
    pub fn can_pause(&self) -> bool {
        self.timer.status() == Status::Running
    }

    /// Renders the heading, field, clock, controls and help line.
    pub fn view(&self) -> String {

        let clock_style = if self.timer.expired() {
            &self.styles.clock_finished
        } else {
            &self.styles.clock
        };

        let buttons = [
            self.button(self.timer.start_label(), self.can_start()),
            self.button("Pause", self.can_pause()),
            self.button("Reset", true),
        ]
        .join("  ");

        [
            self.styles.title.clone().inline(true).render(&self.title),
            String::new(),
            self.input.view(),
            String::new(),
            clock_style.clone().inline(true).render(&self.timer.view()),
            String::new(),
            buttons,
            String::new(),
            self.help.view(&self.key_map),
        ]
        .join("\n")
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.input.focus()
    }

    fn blur(&mut self) {
        self.input.blur();
    }

    fn focused(&self) -> bool {
        self.input.focused()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (new(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
