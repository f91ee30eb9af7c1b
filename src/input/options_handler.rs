//! Options menu handler
//!
//! Modal handler for the client's options screen (o). Adjusts the speech
//! parameters the next synthesis will use and persists them to the config
//! file:
//! - p: set pitch (-2.0 to 2.0)
//! - r: set rate (0.5 to 2.0)
//! - v: set volume (0.0 to 1.5)
//! - a: toggle autoplay
//! - Enter or q: leave the menu

use super::buffer_handler::BufferHandler;
use super::{HandlerAction, KeyHandler};
use crate::state::config::{clamp_param, PITCH_RANGE, RATE_RANGE, VOLUME_RANGE};
use crate::state::App;
use crate::view::emit;
use crate::{Result, TtscError};
use log::debug;

/// Options menu key handler
pub struct OptionsHandler;

impl Default for OptionsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsHandler {
    /// Print the menu and create the handler
    pub fn new() -> Self {
        emit("Options: p=pitch r=rate v=volume a=autoplay, Enter/q to leave");
        Self
    }

    fn set_pitch(input: String, app: &mut App) -> Result<()> {
        let value = parse_param(&input, PITCH_RANGE)?;
        app.params.pitch = value;
        app.config.set("speech", "pitch", &format!("{:.1}", value));
        app.config.save()?;
        app.notifier.info(&format!("Pitch {:.1}", value));
        Ok(())
    }

    fn set_rate(input: String, app: &mut App) -> Result<()> {
        let value = parse_param(&input, RATE_RANGE)?;
        app.params.rate = value;
        app.config.set("speech", "rate", &format!("{:.1}", value));
        app.config.save()?;
        app.notifier.info(&format!("Rate {:.1}", value));
        Ok(())
    }

    fn set_volume(input: String, app: &mut App) -> Result<()> {
        let value = parse_param(&input, VOLUME_RANGE)?;
        app.params.volume = value;
        app.config.set("speech", "volume", &format!("{:.1}", value));
        app.config.save()?;
        app.notifier.info(&format!("Volume {:.1}", value));
        Ok(())
    }

    /// Process options menu keys
    pub fn process_with_state(&mut self, key: &[u8], app: &mut App) -> Result<HandlerAction> {
        match key {
            b"p" => {
                debug!("Options: pitch");
                app.handlers.push(Box::new(BufferHandler::new(
                    &format!("Pitch ({:.1} to {:.1}):", PITCH_RANGE.0, PITCH_RANGE.1),
                    Box::new(Self::set_pitch),
                )));
                Ok(HandlerAction::Handled)
            }

            b"r" => {
                debug!("Options: rate");
                app.handlers.push(Box::new(BufferHandler::new(
                    &format!("Rate ({:.1} to {:.1}):", RATE_RANGE.0, RATE_RANGE.1),
                    Box::new(Self::set_rate),
                )));
                Ok(HandlerAction::Handled)
            }

            b"v" => {
                debug!("Options: volume");
                app.handlers.push(Box::new(BufferHandler::new(
                    &format!("Volume ({:.1} to {:.1}):", VOLUME_RANGE.0, VOLUME_RANGE.1),
                    Box::new(Self::set_volume),
                )));
                Ok(HandlerAction::Handled)
            }

            b"a" => {
                debug!("Options: toggle autoplay");
                app.autoplay = !app.autoplay;
                app.config
                    .set("speech", "autoplay", &app.autoplay.to_string());
                app.config.save()?;
                app.notifier.info(if app.autoplay {
                    "Autoplay on"
                } else {
                    "Autoplay off"
                });
                Ok(HandlerAction::Handled)
            }

            b"\r" | b"\n" | b"q" | b"\x1b" => {
                emit("(options closed)");
                Ok(HandlerAction::Remove)
            }

            _ => Ok(HandlerAction::Handled),
        }
    }
}

/// Parse a slider-style parameter, clamping into range
fn parse_param(input: &str, range: (f32, f32)) -> Result<f32> {
    let value: f32 = input
        .trim()
        .parse()
        .map_err(|_| TtscError::Validation(format!("Not a number: '{}'", input.trim())))?;
    Ok(clamp_param(value, range))
}

impl KeyHandler for OptionsHandler {
    fn process(&mut self, _key: &[u8]) -> Result<HandlerAction> {
        Ok(HandlerAction::Handled)
    }

    fn process_with_app(&mut self, key: &[u8], app: &mut App) -> Result<HandlerAction> {
        self.process_with_state(key, app)
    }
}
