//! Buffer handler for collecting text input
//!
//! Used whenever the client needs a line of input from the user (the text
//! to synthesize, a file path, credentials, a numeric parameter). Keys are
//! echoed; Enter accepts, Escape cancels.

use super::{HandlerAction, KeyHandler};
use crate::state::App;
use crate::view::emit;
use crate::Result;
use log::debug;
use std::io::{self, Write};

/// Callback function type for when input is complete
type OnAcceptFn = Box<dyn FnOnce(String, &mut App) -> Result<()>>;

/// Handler that collects a line of input until Enter is pressed
///
/// When the user presses Enter, calls the provided callback with the
/// collected text. Escape abandons the input.
pub struct BufferHandler {
    /// Accumulated input buffer
    buffer: String,

    /// Hide echoed characters (passwords)
    masked: bool,

    /// Callback to execute when Enter is pressed
    on_accept: Option<OnAcceptFn>,
}

impl BufferHandler {
    /// Create a new buffer handler, prompting first
    pub fn new(prompt: &str, on_accept: OnAcceptFn) -> Self {
        emit(prompt);
        Self {
            buffer: String::new(),
            masked: false,
            on_accept: Some(on_accept),
        }
    }

    /// Create a masked handler for credential input
    pub fn masked(prompt: &str, on_accept: OnAcceptFn) -> Self {
        emit(prompt);
        Self {
            buffer: String::new(),
            masked: true,
            on_accept: Some(on_accept),
        }
    }

    fn echo(&self, s: &str) {
        let mut stdout = io::stdout();
        let shown = if self.masked { "*" } else { s };
        let _ = write!(stdout, "{}", shown);
        let _ = stdout.flush();
    }

    /// Process input with app access
    pub fn process_input(&mut self, key: &[u8], app: &mut App) -> Result<HandlerAction> {
        match key {
            // Enter - accept input and invoke callback
            b"\r" | b"\n" => {
                emit("");
                debug!("BufferHandler: accepting {} chars", self.buffer.len());

                if let Some(callback) = self.on_accept.take() {
                    if let Err(e) = callback(self.buffer.clone(), app) {
                        app.report(&e);
                    }
                }

                Ok(HandlerAction::Remove)
            }

            // Escape - abandon input
            b"\x1b" => {
                emit("");
                emit("(cancelled)");
                Ok(HandlerAction::Remove)
            }

            // Backspace - remove last character
            b"\x08" | b"\x7f" => {
                if self.buffer.pop().is_some() {
                    let mut stdout = io::stdout();
                    let _ = write!(stdout, "\x08 \x08");
                    let _ = stdout.flush();
                }
                Ok(HandlerAction::Handled)
            }

            // Regular characters - add to buffer
            _ => {
                if let Ok(s) = std::str::from_utf8(key) {
                    // Keep control bytes out of collected input
                    let printable: String = s.chars().filter(|c| !c.is_control()).collect();
                    if !printable.is_empty() {
                        self.buffer.push_str(&printable);
                        self.echo(&printable);
                    }
                }
                Ok(HandlerAction::Handled)
            }
        }
    }
}

impl KeyHandler for BufferHandler {
    fn process(&mut self, _key: &[u8]) -> Result<HandlerAction> {
        // Needs app access - use process_with_app
        Ok(HandlerAction::Handled)
    }

    fn process_with_app(&mut self, key: &[u8], app: &mut App) -> Result<HandlerAction> {
        self.process_input(key, app)
    }
}
