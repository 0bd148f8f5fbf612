#![warn(missing_docs)]

//! # bubbletea-countdown
//!
//! A countdown timer widget for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: a numeric duration field, an `MM:SS` clock and start, pause
//! and reset controls.
//!
//! ## Overview
//!
//! The crate is split the way Elm-architecture components usually are. Each
//! part exposes `update()` and `view()` and can be used on its own:
//!
//! - [`countdown`]: the engine. It owns the configured duration, the seconds
//!   remaining, the `Idle`/`Running`/`Paused` status and the single tick
//!   source that removes one second per tick.
//! - [`durationinput`]: a one-line field that only accepts number characters.
//! - [`widget`]: the composed widget that binds keys to engine operations.
//! - [`key`] and [`help`]: key bindings and the help line listing them.
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//! use bubbletea_rs::{Model, Cmd, Msg};
//!
//! struct App {
//!     countdown: Countdown,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         (Self { countdown: countdown_new() }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.countdown.view()
//!     }
//! }
//! ```
//!
//! ## Driving the engine directly
//!
//! ```rust
//! use bubbletea_countdown::countdown::{Model, Status};
//!
//! let mut timer = Model::new();
//! timer.set_duration(3);
//! let _first_tick = timer.start();
//!
//! for _ in 0..3 {
//!     let tick = timer.tick_msg();
//!     let _ = timer.update(Box::new(tick));
//! }
//! assert_eq!(timer.view(), "00:00");
//! assert_eq!(timer.status(), Status::Running);
//! assert!(!timer.ticking());
//! ```

pub mod countdown;
pub mod durationinput;
pub mod help;
pub mod key;
pub mod widget;

use bubbletea_rs::Cmd;

/// Keyboard focus handling shared by the focusable components.
///
/// A focused component reacts to key presses; a blurred one ignores them.
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
///
/// let mut input = duration_input_new();
/// assert!(!input.focused());
///
/// input.focus();
/// assert!(input.focused());
///
/// input.blur();
/// assert!(!input.focused());
/// ```
pub trait Component {
    /// Gives the component keyboard focus. May return a command to run.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes keyboard focus.
    fn blur(&mut self);

    /// Reports whether the component has focus.
    fn focused(&self) -> bool;
}

pub use countdown::{
    format_remaining, parse_duration, Action as CountdownAction,
    ControlMsg as CountdownControlMsg, Model as CountdownEngine, Status as CountdownStatus,
    TickMsg as CountdownTickMsg, TimeoutMsg as CountdownTimeoutMsg,
};
pub use durationinput::{new as duration_input_new, Model as DurationInput};
pub use help::Model as HelpModel;
pub use key::{Binding, Help as KeyHelp, KeyPress};
pub use widget::{new as countdown_new, Model as Countdown};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
///
/// let countdown = countdown_new();
/// assert_eq!(countdown.timer.status(), CountdownStatus::Idle);
/// ```
pub mod prelude {
    pub use crate::countdown::{
        format_remaining, parse_duration, Action as CountdownAction,
        ControlMsg as CountdownControlMsg, Model as CountdownEngine,
        Status as CountdownStatus, TickMsg as CountdownTickMsg,
        TimeoutMsg as CountdownTimeoutMsg,
    };
    pub use crate::durationinput::{new as duration_input_new, Model as DurationInput};
    pub use crate::help::{KeyMap, Model as HelpModel};
    pub use crate::key::{Binding, Help as KeyHelp, KeyPress};
    pub use crate::widget::{new as countdown_new, Model as Countdown};
    pub use crate::Component;
}
