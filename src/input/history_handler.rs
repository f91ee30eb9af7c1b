//! History browser handler
//!
//! Modal handler for the session history (H). The user first picks an entry
//! by number, then acts on it:
//! - p: play the entry's clip
//! - u: upload it to server-side storage (requires a session)
//! - w: write the clip to a file
//! - digits + Enter: pick a different entry
//! - q: leave the browser

use super::buffer_handler::BufferHandler;
use super::{HandlerAction, KeyHandler};
use crate::state::App;
use crate::view::emit;
use crate::Result;
use log::debug;
use std::io::{self, Write};

/// History browser key handler
pub struct HistoryHandler {
    /// Currently picked entry (0-based)
    selected: Option<usize>,

    /// Digit accumulator for entry selection
    buffer: String,
}

impl HistoryHandler {
    /// Print the history and create the handler
    pub fn new(app: &App) -> Self {
        app.show_history();
        emit("History: number + Enter to pick an entry, q to leave");
        Self {
            selected: None,
            buffer: String::new(),
        }
    }

    fn with_selected(
        &self,
        app: &mut App,
        act: impl FnOnce(&mut App, usize) -> Result<()>,
    ) -> Result<HandlerAction> {
        match self.selected {
            Some(index) => {
                if let Err(e) = act(app, index) {
                    app.report(&e);
                }
                Ok(HandlerAction::Handled)
            }
            None => {
                emit("Pick an entry first (number + Enter)");
                Ok(HandlerAction::Handled)
            }
        }
    }
}

impl KeyHandler for HistoryHandler {
    fn process(&mut self, _key: &[u8]) -> Result<HandlerAction> {
        Ok(HandlerAction::Handled)
    }

    fn process_with_app(&mut self, key: &[u8], app: &mut App) -> Result<HandlerAction> {
        match key {
            b"q" | b"\x1b" => {
                emit("(history closed)");
                Ok(HandlerAction::Remove)
            }

            b"\r" | b"\n" => {
                emit("");
                if self.buffer.is_empty() {
                    return Ok(HandlerAction::Handled);
                }
                let choice = self.buffer.parse::<usize>().ok();
                self.buffer.clear();
                match choice {
                    Some(n) if n >= 1 && n <= app.history.len() => {
                        self.selected = Some(n - 1);
                        debug!("History entry {} picked", n);
                        emit(&format!("Entry {}: p=play u=upload w=write q=back", n));
                    }
                    _ => emit(&format!(
                        "Enter a number between 1 and {}",
                        app.history.len()
                    )),
                }
                Ok(HandlerAction::Handled)
            }

            b"p" => self.with_selected(app, |app, index| app.play_history_entry(index)),

            b"u" => self.with_selected(app, |app, index| app.upload_history_entry(index)),

            b"w" => {
                let Some(index) = self.selected else {
                    emit("Pick an entry first (number + Enter)");
                    return Ok(HandlerAction::Handled);
                };
                app.handlers.push(Box::new(BufferHandler::new(
                    "Write clip to path:",
                    Box::new(move |dest, app| app.download_history_entry(index, &dest)),
                )));
                Ok(HandlerAction::Handled)
            }

            _ => {
                if let Ok(s) = std::str::from_utf8(key) {
                    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
                    if !digits.is_empty() {
                        self.buffer.push_str(&digits);
                        let mut stdout = io::stdout();
                        let _ = write!(stdout, "{}", digits);
                        let _ = stdout.flush();
                    }
                }
                Ok(HandlerAction::Handled)
            }
        }
    }
}
