//! Numbered menu handler
//!
//! Presents a list of items and collects a 1-based index. Digits accumulate
//! (voice lists can run past nine entries), Enter confirms, q or Escape
//! backs out.

use super::{HandlerAction, KeyHandler};
use crate::state::App;
use crate::view::emit;
use crate::Result;
use log::debug;
use std::io::{self, Write};

/// Callback invoked with the selected 0-based index
type OnSelectFn = Box<dyn FnOnce(usize, &mut App) -> Result<()>>;

/// Modal numbered menu
pub struct MenuHandler {
    item_count: usize,
    buffer: String,
    on_select: Option<OnSelectFn>,
}

impl MenuHandler {
    /// Print the menu and create the handler
    pub fn new(title: &str, items: &[String], on_select: OnSelectFn) -> Self {
        emit(title);
        for (i, item) in items.iter().enumerate() {
            emit(&format!("{:>3}. {}", i + 1, item));
        }
        emit("Number + Enter to choose, q to cancel:");
        Self {
            item_count: items.len(),
            buffer: String::new(),
            on_select: Some(on_select),
        }
    }

    fn echo(&self, s: &str) {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "{}", s);
        let _ = stdout.flush();
    }
}

impl KeyHandler for MenuHandler {
    fn process(&mut self, _key: &[u8]) -> Result<HandlerAction> {
        Ok(HandlerAction::Handled)
    }

    fn process_with_app(&mut self, key: &[u8], app: &mut App) -> Result<HandlerAction> {
        match key {
            b"q" | b"\x1b" => {
                emit("");
                emit("(cancelled)");
                Ok(HandlerAction::Remove)
            }

            b"\r" | b"\n" => {
                emit("");
                let choice = self.buffer.parse::<usize>().ok();
                match choice {
                    Some(n) if n >= 1 && n <= self.item_count => {
                        debug!("Menu choice: {}", n);
                        if let Some(callback) = self.on_select.take() {
                            if let Err(e) = callback(n - 1, app) {
                                app.report(&e);
                            }
                        }
                        Ok(HandlerAction::Remove)
                    }
                    _ => {
                        emit(&format!(
                            "Enter a number between 1 and {}:",
                            self.item_count
                        ));
                        self.buffer.clear();
                        Ok(HandlerAction::Handled)
                    }
                }
            }

            b"\x08" | b"\x7f" => {
                if self.buffer.pop().is_some() {
                    let mut stdout = io::stdout();
                    let _ = write!(stdout, "\x08 \x08");
                    let _ = stdout.flush();
                }
                Ok(HandlerAction::Handled)
            }

            _ => {
                if let Ok(s) = std::str::from_utf8(key) {
                    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
                    if !digits.is_empty() {
                        self.buffer.push_str(&digits);
                        self.echo(&digits);
                    }
                }
                Ok(HandlerAction::Handled)
            }
        }
    }
}
