//! Countdown engine for Bubble Tea applications.
//!
//! The engine owns a configured duration, the seconds remaining and an
//! [`Status`] of `Idle`, `Running` or `Paused`. While running it keeps exactly
//! one tick chain alive: a bubbletea-rs `tick` command that delivers a
//! [`TickMsg`] once per second and is re-armed by every tick it applies.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::countdown::{format_remaining, Model, Status};
//!
//! let mut timer = Model::new();
//! timer.set_duration(90);
//! assert_eq!(timer.view(), "01:30");
//! assert_eq!(timer.status(), Status::Idle);
//!
//! // Starting hands back the command that schedules the first tick.
//! let cmd = timer.start();
//! assert!(cmd.is_some());
//! assert_eq!(timer.status(), Status::Running);
//! assert_eq!(format_remaining(timer.remaining()), "01:30");
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use bubbletea_countdown::countdown::{Model, TimeoutMsg};
//!
//! struct MyApp {
//!     timer: Model,
//!     finished: bool,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = Model::new();
//!         timer.set_duration(10);
//!         let cmd = timer.start();
//!         (Self { timer, finished: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
//!             if timeout.id == self.timer.id() {
//!                 self.finished = true;
//!             }
//!         }
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Time remaining: {}", self.timer.view())
//!     }
//! }
//! ```
//!
//! # Message Control
//!
//! Other components can drive an engine without holding a mutable reference
//! to it by sending a [`ControlMsg`]:
//!
//! ```rust
//! use bubbletea_countdown::countdown::{Action, Model};
//!
//! let timer = Model::new();
//! let _set = timer.control(Action::SetDuration(30));
//! let _start = timer.control(Action::Start);
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Cadence of the tick source. Every applied tick removes one second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// Internal ID management for engine instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Formats whole seconds as `MM:SS`.
///
/// Minutes are `floor(secs / 60)` and seconds are `secs % 60`, both padded to
/// two digits. Minutes are not wrapped into hours, so `6000` renders as
/// `"100:00"`.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::countdown::format_remaining;
///
/// assert_eq!(format_remaining(0), "00:00");
/// assert_eq!(format_remaining(65), "01:05");
/// assert_eq!(format_remaining(599), "09:59");
/// ```
pub fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Parses raw duration text into a positive whole number of seconds.
///
/// Surrounding whitespace is ignored and any decimal notation is accepted
/// (`"90"`, `"+90"`, `"9e1"`, `"90.0"`). The value is returned only when it is
/// finite, greater than zero, integral and fits in an `i64`.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::countdown::parse_duration;
///
/// assert_eq!(parse_duration(" 90 "), Some(90));
/// assert_eq!(parse_duration("1e2"), Some(100));
/// assert_eq!(parse_duration("0"), None);
/// assert_eq!(parse_duration("-5"), None);
/// assert_eq!(parse_duration("NaN"), None);
/// assert_eq!(parse_duration("1.5"), None);
/// assert_eq!(parse_duration(""), None);
/// ```
pub fn parse_duration(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(whole) = trimmed.parse::<i64>() {
        return (whole > 0).then_some(whole);
    }

    // Fraction and exponent forms; only integral values survive.
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 {
        return None;
    }
    // i64::MAX rounds up to 2^63 as an f64, which is itself out of range.
    if value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

/// Lifecycle state of a countdown.
///
/// `Idle` covers both "never started" and "reset". An expired countdown stays
/// `Running` with zero seconds left; see [`Model::expired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Not counting. The remaining time equals the configured duration.
    #[default]
    Idle,
    /// Counting down, or expired at zero.
    Running,
    /// Counting suspended; `start` resumes from the same remaining time.
    Paused,
}

/// Message sent by the tick source once per elapsed second.
///
/// A tick is applied only by the engine whose id it carries and only when its
/// tag is the one the engine is waiting for. Ticks that were in flight when the
/// countdown was paused, reset or re-configured are therefore dropped.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Identifier of the engine that scheduled this tick.
    pub id: i64,

    tag: i64,
}

/// Message sent once when a running countdown reaches zero.
#[derive(Debug, Clone)]
pub struct TimeoutMsg {
    /// Identifier of the engine that expired.
    pub id: i64,
}

/// An operation requested through a [`ControlMsg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Configure a new duration in seconds. Non-positive values are ignored.
    SetDuration(i64),
    /// Start, or resume from pause.
    Start,
    /// Pause a running countdown.
    Pause,
    /// Return to the configured duration and stop.
    Reset,
}

/// Message that applies an [`Action`] to an engine.
///
/// An `id` of `0` addresses every engine that receives the message.
#[derive(Debug, Clone)]
pub struct ControlMsg {
    /// Target engine, or `0` for any.
    pub id: i64,
    /// What to do.
    pub action: Action,
}

/// The countdown engine.
///
/// All operations are infallible: a call that is not valid in the current
/// state leaves the engine untouched.
#[derive(Debug, Clone)]
pub struct Model {
    configured: u64,
    remaining: u64,
    status: Status,

    id: i64,
    tag: i64,
    // Tag of the live tick chain; `None` means the tick source is stopped.
    armed: Option<i64>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an idle engine with no duration configured.
    pub fn new() -> Self {
        Self {
            configured: 0,
            remaining: 0,
            status: Status::Idle,
            id: next_id(),
            tag: 0,
            armed: None,
        }
    }

    /// Returns the unique identifier of this engine.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the last duration set, in seconds.
    pub fn configured_duration(&self) -> u64 {
        self.configured
    }

    /// Returns the seconds left.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Reports whether the tick source is active.
    pub fn ticking(&self) -> bool {
        self.armed.is_some()
    }

    /// Reports whether the countdown ran out while running.
    pub fn expired(&self) -> bool {
        self.status == Status::Running && self.remaining == 0
    }

    /// Label for the start control: `"Resume"` while paused, `"Start"` otherwise.
    pub fn start_label(&self) -> &'static str {
        match self.status {
            Status::Paused => "Resume",
            Status::Idle | Status::Running => "Start",
        }
    }

    /// Configures a new duration in seconds.
    ///
    /// Values that are not positive are ignored. Otherwise both the configured
    /// and remaining time become `seconds`, the status becomes `Idle` and the
    /// tick source is stopped.
    pub fn set_duration(&mut self, seconds: i64) {
        let Ok(seconds) = u64::try_from(seconds) else {
            trace!(id = self.id, seconds, "ignoring negative duration");
            return;
        };
        if seconds == 0 {
            trace!(id = self.id, "ignoring zero duration");
            return;
        }

        self.disarm();
        self.configured = seconds;
        self.remaining = seconds;
        self.status = Status::Idle;
        debug!(id = self.id, seconds, "duration set");
    }

    /// Parses `raw` with [`parse_duration`] and applies it.
    ///
    /// Text that does not describe a positive whole number is ignored.
    pub fn set_duration_input(&mut self, raw: &str) {
        match parse_duration(raw) {
            Some(seconds) => self.set_duration(seconds),
            None => trace!(id = self.id, raw, "ignoring invalid duration input"),
        }
    }

    /// Starts or resumes the countdown.
    ///
    /// Does nothing when no time is left. Returns the command for the first
    /// tick when the tick source was not already active.
    pub fn start(&mut self) -> Option<Cmd> {
        if self.remaining == 0 {
            return None;
        }

        self.status = Status::Running;
        if self.armed.is_some() {
            return None;
        }
        debug!(id = self.id, remaining = self.remaining, "countdown started");
        Some(self.arm())
    }

    /// Pauses a running countdown and stops the tick source.
    pub fn pause(&mut self) {
        if self.status != Status::Running {
            return;
        }

        self.disarm();
        self.status = Status::Paused;
        debug!(id = self.id, remaining = self.remaining, "countdown paused");
    }

    /// Stops the tick source and restores the configured duration.
    pub fn reset(&mut self) {
        self.disarm();
        self.remaining = self.configured;
        self.status = Status::Idle;
        debug!(id = self.id, remaining = self.remaining, "countdown reset");
    }

    /// Applies an action as if the matching method had been called.
    pub fn apply(&mut self, action: Action) -> Option<Cmd> {
        match action {
            Action::SetDuration(seconds) => self.set_duration(seconds),
            Action::Start => return self.start(),
            Action::Pause => self.pause(),
            Action::Reset => self.reset(),
        }
        None
    }

    /// Returns a command that delivers `action` to this engine as a [`ControlMsg`].
    pub fn control(&self, action: Action) -> Cmd {
        send(ControlMsg {
            id: self.id,
            action,
        })
    }

    /// Builds the tick message this engine is currently waiting for.
    ///
    /// Useful for hosts that drive the clock themselves and for tests. When the
    /// tick source is stopped the returned message is ignored by [`update`](Self::update).
    pub fn tick_msg(&self) -> TickMsg {
        TickMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    fn arm(&mut self) -> Cmd {
        self.tag += 1;
        self.armed = Some(self.tag);
        self.tick()
    }

    fn disarm(&mut self) {
        if self.armed.take().is_some() {
            trace!(id = self.id, "tick source stopped");
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;

        bubbletea_tick(TICK_INTERVAL, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn on_tick(&mut self, tick: &TickMsg) -> Option<Cmd> {
        if tick.id != self.id || self.armed != Some(tick.tag) {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        trace!(id = self.id, remaining = self.remaining, "tick");

        if self.remaining == 0 {
            // Status deliberately stays Running: the countdown is expired, not idle.
            self.disarm();
            info!(id = self.id, "countdown expired");
            return Some(send(TimeoutMsg { id: self.id }));
        }

        Some(self.arm())
    }

    /// Processes tick and control messages.
    ///
    /// Returns the next tick command while counting, a [`TimeoutMsg`] command
    /// on expiry, and `None` for anything this engine does not handle.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(control) = msg.downcast_ref::<ControlMsg>() {
            if control.id != 0 && control.id != self.id {
                return None;
            }
            return self.apply(control.action);
        }

        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            return self.on_tick(tick);
        }

        None
    }

    /// Renders the remaining time as `MM:SS`.
    pub fn view(&self) -> String {
        format_remaining(self.remaining)
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Self::new(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

fn send<M: std::any::Any + Send>(msg: M) -> Cmd {
    Box::pin(async move { Some(Box::new(msg) as Msg) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_n(timer: &mut Model, n: usize) {
        for _ in 0..n {
            let msg = timer.tick_msg();
            let _ = timer.update(Box::new(msg));
        }
    }

    #[test]
    fn test_new_is_idle_and_empty() {
        let timer = Model::new();
        assert_eq!(timer.status(), Status::Idle);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.configured_duration(), 0);
        assert!(!timer.ticking());
        assert!(timer.id() > 0);
        assert_eq!(timer.view(), "00:00");
    }

    #[test]
    fn test_unique_ids() {
        let a = Model::new();
        let b = Model::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(65), "01:05");
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(599), "09:59");
        assert_eq!(format_remaining(60), "01:00");
        assert_eq!(format_remaining(6000), "100:00");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("42"), Some(42));
        assert_eq!(parse_duration("  7\n"), Some(7));
        assert_eq!(parse_duration("+3"), Some(3));
        assert_eq!(parse_duration("2.0"), Some(2));
        assert_eq!(parse_duration("1e3"), Some(1000));
        assert_eq!(parse_duration("9007199254740993"), Some(9_007_199_254_740_993));
        assert_eq!(parse_duration("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_duration("99999999999999999999"), None);

        for bad in ["", "   ", "0", "-0", "-5", "NaN", "inf", "1.5", "abc", "12s", "1e400"] {
            assert_eq!(parse_duration(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_set_duration_resets_to_idle() {
        for d in [1_i64, 59, 65, 599, 3600] {
            let mut timer = Model::new();
            timer.set_duration(d);
            assert_eq!(timer.view(), format_remaining(d as u64));
            assert_eq!(timer.status(), Status::Idle);
            assert_eq!(timer.configured_duration(), d as u64);
        }
    }

    #[test]
    fn test_invalid_duration_is_ignored() {
        let mut timer = Model::new();
        timer.set_duration(10);
        let _ = timer.start();
        tick_n(&mut timer, 2);

        timer.set_duration(0);
        timer.set_duration(-5);
        timer.set_duration_input("NaN");
        timer.set_duration_input("");

        assert_eq!(timer.remaining(), 8);
        assert_eq!(timer.configured_duration(), 10);
        assert_eq!(timer.status(), Status::Running);
        assert!(timer.ticking());
    }

    #[test]
    fn test_set_duration_input() {
        let mut timer = Model::new();
        timer.set_duration_input(" 125 ");
        assert_eq!(timer.view(), "02:05");

        // Whole numbers beyond f64 precision are kept exact.
        timer.set_duration_input("9007199254740993");
        assert_eq!(timer.remaining(), 9_007_199_254_740_993);
    }

    #[test]
    fn test_set_duration_while_running_stops_ticks() {
        let mut timer = Model::new();
        timer.set_duration(5);
        let _ = timer.start();
        let stale = timer.tick_msg();

        timer.set_duration(20);
        assert_eq!(timer.status(), Status::Idle);
        assert!(!timer.ticking());

        assert!(timer.update(Box::new(stale)).is_none());
        assert_eq!(timer.remaining(), 20);
    }

    #[test]
    fn test_start_with_nothing_left_is_noop() {
        let mut timer = Model::new();
        assert!(timer.start().is_none());
        assert_eq!(timer.status(), Status::Idle);
        assert!(!timer.ticking());
    }

    #[test]
    fn test_start_arms_tick_source_once() {
        let mut timer = Model::new();
        timer.set_duration(10);

        assert!(timer.start().is_some());
        assert_eq!(timer.status(), Status::Running);
        assert!(timer.ticking());

        // Already ticking: no second chain.
        assert!(timer.start().is_none());
        assert_eq!(timer.status(), Status::Running);
    }

    #[test]
    fn test_countdown_to_zero_stops_ticking() {
        let mut timer = Model::new();
        timer.set_duration(3);
        let _ = timer.start();

        tick_n(&mut timer, 3);
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.ticking());
        assert_eq!(timer.status(), Status::Running);
        assert!(timer.expired());

        let fourth = timer.tick_msg();
        assert!(timer.update(Box::new(fourth)).is_none());
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.status(), Status::Running);
    }

    #[tokio::test]
    async fn test_expiry_emits_timeout() {
        let mut timer = Model::new();
        timer.set_duration(1);
        let _ = timer.start();

        let tick = timer.tick_msg();
        let cmd = timer.update(Box::new(tick)).expect("timeout command");
        let msg = cmd.await.expect("timeout message");
        let timeout = msg.downcast_ref::<TimeoutMsg>().expect("TimeoutMsg");
        assert_eq!(timeout.id, timer.id());
    }

    #[test]
    fn test_start_after_expiry_is_noop() {
        let mut timer = Model::new();
        timer.set_duration(1);
        let _ = timer.start();
        tick_n(&mut timer, 1);

        assert!(timer.start().is_none());
        assert!(!timer.ticking());
        assert_eq!(timer.status(), Status::Running);
    }

    #[test]
    fn test_pause_and_resume_keeps_remaining() {
        let mut timer = Model::new();
        timer.set_duration(10);
        let _ = timer.start();
        tick_n(&mut timer, 4);

        timer.pause();
        assert_eq!(timer.status(), Status::Paused);
        assert!(!timer.ticking());
        assert_eq!(timer.start_label(), "Resume");
        assert_eq!(timer.remaining(), 6);

        assert!(timer.start().is_some());
        assert_eq!(timer.status(), Status::Running);
        assert_eq!(timer.remaining(), 6);
        assert_eq!(timer.start_label(), "Start");
    }

    #[test]
    fn test_pause_when_not_running_is_noop() {
        let mut timer = Model::new();
        timer.set_duration(10);
        timer.pause();
        assert_eq!(timer.status(), Status::Idle);
        assert_eq!(timer.start_label(), "Start");
    }

    #[test]
    fn test_ticks_before_pause_are_dropped() {
        let mut timer = Model::new();
        timer.set_duration(10);
        let _ = timer.start();
        let in_flight = timer.tick_msg();

        timer.pause();
        assert!(timer.update(Box::new(in_flight.clone())).is_none());
        assert_eq!(timer.remaining(), 10);

        // Resuming arms a new chain; the old tick still does not count.
        let _ = timer.start();
        assert!(timer.update(Box::new(in_flight)).is_none());
        assert_eq!(timer.remaining(), 10);
    }

    #[test]
    fn test_reset_restores_configured_duration() {
        for prior in [Status::Idle, Status::Running, Status::Paused] {
            let mut timer = Model::new();
            timer.set_duration(30);
            let _ = timer.start();
            tick_n(&mut timer, 5);
            match prior {
                Status::Idle => {
                    timer.reset();
                    tick_n(&mut timer, 1);
                }
                Status::Paused => timer.pause(),
                Status::Running => {}
            }

            timer.reset();
            assert_eq!(timer.remaining(), 30);
            assert_eq!(timer.status(), Status::Idle);
            assert!(!timer.ticking());
        }
    }

    #[test]
    fn test_leaving_expired_state() {
        let mut timer = Model::new();
        timer.set_duration(2);
        let _ = timer.start();
        tick_n(&mut timer, 2);
        assert!(timer.expired());

        // start stays a no-op with nothing left
        assert!(timer.start().is_none());
        assert!(!timer.ticking());
        assert_eq!(timer.status(), Status::Running);

        timer.pause();
        assert_eq!(timer.status(), Status::Paused);
        assert_eq!(timer.start_label(), "Resume");
        assert!(!timer.expired());

        assert!(timer.start().is_none());
        assert!(!timer.ticking());
        assert_eq!(timer.status(), Status::Paused);

        timer.reset();
        assert_eq!(timer.status(), Status::Idle);
        assert_eq!(timer.remaining(), timer.configured_duration());
        assert_eq!(timer.remaining(), 2);
        assert!(!timer.ticking());
    }

    #[test]
    fn test_reset_straight_from_expired() {
        let mut timer = Model::new();
        timer.set_duration(1);
        let _ = timer.start();
        tick_n(&mut timer, 1);
        assert!(timer.expired());

        timer.reset();
        assert_eq!(timer.status(), Status::Idle);
        assert_eq!(timer.remaining(), 1);
        assert!(!timer.ticking());
    }

    #[test]
    fn test_reset_without_duration() {
        let mut timer = Model::new();
        timer.reset();
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.status(), Status::Idle);
    }

    #[test]
    fn test_tick_for_other_engine_is_ignored() {
        let mut a = Model::new();
        let mut b = Model::new();
        a.set_duration(5);
        b.set_duration(5);
        let _ = a.start();
        let _ = b.start();

        let for_b = b.tick_msg();
        assert!(a.update(Box::new(for_b)).is_none());
        assert_eq!(a.remaining(), 5);
    }

    #[test]
    fn test_each_tick_rearms_with_fresh_tag() {
        let mut timer = Model::new();
        timer.set_duration(5);
        let _ = timer.start();

        let first = timer.tick_msg();
        assert!(timer.update(Box::new(first.clone())).is_some());
        // Replaying the consumed tick must not double count.
        assert!(timer.update(Box::new(first)).is_none());
        assert_eq!(timer.remaining(), 4);
    }

    #[test]
    fn test_update_with_control_msg() {
        let mut timer = Model::new();
        let id = timer.id();

        let set = ControlMsg {
            id,
            action: Action::SetDuration(12),
        };
        assert!(timer.update(Box::new(set)).is_none());
        assert_eq!(timer.remaining(), 12);

        let start = ControlMsg {
            id: 0,
            action: Action::Start,
        };
        assert!(timer.update(Box::new(start)).is_some());
        assert_eq!(timer.status(), Status::Running);

        let wrong = ControlMsg {
            id: id + 999,
            action: Action::Reset,
        };
        assert!(timer.update(Box::new(wrong)).is_none());
        assert_eq!(timer.status(), Status::Running);
    }

    #[tokio::test]
    async fn test_control_command_delivers_message() {
        let mut timer = Model::new();
        let cmd = timer.control(Action::SetDuration(45));
        let msg = cmd.await.expect("control message");
        let _ = timer.update(msg);
        assert_eq!(timer.view(), "00:45");
    }

    #[test]
    fn test_unrelated_message_is_ignored() {
        let mut timer = Model::new();
        assert!(timer.update(Box::new(42_u32)).is_none());
    }
}
