//! Help line for key bindings.
//!
//! Components describe their bindings by implementing [`KeyMap`]; the help
//! [`Model`] renders them either as one compact line or as columns.
//!
//! ```rust
//! use bubbletea_countdown::help::{KeyMap, Model};
//! use bubbletea_countdown::key::Binding;
//! use crossterm::event::KeyCode;
//!
//! struct Keys {
//!     start: Binding,
//!     reset: Binding,
//! }
//!
//! impl KeyMap for Keys {
//!     fn short_help(&self) -> Vec<&Binding> {
//!         vec![&self.start, &self.reset]
//!     }
//!
//!     fn full_help(&self) -> Vec<Vec<&Binding>> {
//!         vec![vec![&self.start], vec![&self.reset]]
//!     }
//! }
//!
//! let keys = Keys {
//!     start: Binding::new(vec![KeyCode::Char('s')]).with_help("s", "start"),
//!     reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
//! };
//! let help = Model::new();
//! assert!(!help.view(&keys).is_empty());
//! ```

use crate::key::Binding;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Bindings a component wants listed in its help.
pub trait KeyMap {
    /// Bindings for the one-line view.
    fn short_help(&self) -> Vec<&Binding>;

    /// Binding groups for the column view, one column per group.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Styles for the help view.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Ellipsis shown when the line is cut.
    pub ellipsis: Style,
    /// Key label in the short view.
    pub short_key: Style,
    /// Description in the short view.
    pub short_desc: Style,
    /// Separator between short items.
    pub short_separator: Style,
    /// Key label in the full view.
    pub full_key: Style,
    /// Description in the full view.
    pub full_desc: Style,
    /// Separator between full columns.
    pub full_separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            short_key: key_style.clone(),
            short_desc: desc_style.clone(),
            short_separator: sep_style.clone(),
            full_key: key_style,
            full_desc: desc_style,
            full_separator: sep_style,
        }
    }
}

/// The help view model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Render all groups as columns instead of one line.
    pub show_all: bool,
    /// Maximum width in cells. 0 means unlimited.
    pub width: usize,
    /// Separator between short items.
    pub short_separator: String,
    /// Separator between full columns.
    pub full_separator: String,
    /// Marker shown when items were cut for width.
    pub ellipsis: String,
    /// Styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Creates a help model with default separators and styles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders the short or full view depending on `show_all`.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    /// Renders enabled bindings on one line, cut with an ellipsis at `width`.
    pub fn short_help_view(&self, bindings: Vec<&Binding>) -> String {
        let separator = self
            .styles
            .short_separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        let mut out = String::new();
        let mut total_width = 0;
        for kb in bindings.into_iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let help = kb.help();
            let item = format!(
                "{}{} {}",
                sep,
                self.styles.short_key.clone().inline(true).render(&help.key),
                self.styles.short_desc.clone().inline(true).render(&help.desc),
            );
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.overflow_tail(total_width, item_width) {
                out.push_str(&tail);
                break;
            }
            total_width += item_width;
            out.push_str(&item);
        }
        out
    }

    /// Renders each group as a column of `key description` rows.
    pub fn full_help_view(&self, groups: Vec<Vec<&Binding>>) -> String {
        if groups.is_empty() {
            return String::new();
        }

        let separator = self
            .styles
            .full_separator
            .clone()
            .inline(true)
            .render(&self.full_separator);

        let mut columns: Vec<String> = Vec::new();
        let mut total_width = 0;
        for group in groups {
            let rows: Vec<String> = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| {
                    let help = b.help();
                    format!(
                        "{} {}",
                        self.styles.full_key.clone().inline(true).render(&help.key),
                        self.styles.full_desc.clone().inline(true).render(&help.desc),
                    )
                })
                .collect();
            if rows.is_empty() {
                continue;
            }

            let column = rows.join("\n");
            let col_width = lipgloss::width_visible(&column);
            if let Some(tail) = self.overflow_tail(total_width, col_width) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }
            total_width += col_width;
            columns.push(column);
        }

        if columns.is_empty() {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(col.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    // Some(tail) when the next item does not fit; the tail may be empty.
    fn overflow_tail(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles.ellipsis.clone().inline(true).render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}
