//! Countdown timer in the terminal.
//!
//! Type a number of seconds, press enter to set it, then use `s`, `p` and `r`
//! (`?` shows all keys).
//! `esc` or `ctrl+c` quits. Set `COUNTDOWN_LOG` (e.g. `debug`) to write a log
//! to `countdown.log`.

use std::fs::File;
use std::sync::Mutex;

use anyhow::Result;
use bubbletea_countdown::key::Binding;
use bubbletea_countdown::prelude::*;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model, Msg, Program};
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct App {
    countdown: Countdown,
    quit: Binding,
}

impl Model for App {
    fn init() -> (Self, Option<Cmd>) {
        let app = Self {
            countdown: countdown_new(),
            quit: Binding::new(vec![
                (KeyCode::Esc, KeyModifiers::NONE),
                (KeyCode::Char('c'), KeyModifiers::CONTROL),
            ]),
        };
        (app, None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.quit.matches(key_msg) {
                return Some(quit());
            }
        }
        if let Some(timeout) = msg.downcast_ref::<CountdownTimeoutMsg>() {
            info!(id = timeout.id, "time is up");
        }
        self.countdown.update(msg)
    }

    fn view(&self) -> String {
        format!("\n{}\n\n  esc quit\n", self.countdown.view())
    }
}

fn init_logging() -> Result<()> {
    let Ok(filter) = EnvFilter::try_from_env("COUNTDOWN_LOG") else {
        return Ok(());
    };
    let file = File::create("countdown.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;
    Ok(())
}
