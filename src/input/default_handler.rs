//! Default key handler for the studio client
//!
//! Processes the top-level key bindings: text entry, catalog selection,
//! synthesis, playback, history, and session commands. Modal flows (menus,
//! line input, the options screen) are pushed onto the handler stack.

use super::buffer_handler::BufferHandler;
use super::history_handler::HistoryHandler;
use super::menu_handler::MenuHandler;
use super::options_handler::OptionsHandler;
use super::{HandlerAction, KeyAction};
use crate::catalog::GenderFilter;
use crate::state::App;
use crate::view::emit;
use crate::{Result, TtscError};
use log::{debug, trace};
use std::collections::HashMap;

/// Default key handler for client commands
pub struct DefaultKeyHandler {
    /// Key bindings map
    keymap: HashMap<Vec<u8>, KeyAction>,
}

impl DefaultKeyHandler {
    /// Create a new default key handler
    pub fn new(keymap: HashMap<Vec<u8>, KeyAction>) -> Self {
        debug!("Creating default key handler with {} bindings", keymap.len());
        Self { keymap }
    }

    /// Process a key with the client's key bindings
    pub fn process_key(&mut self, key: &[u8], app: &mut App) -> Result<HandlerAction> {
        if let Some(action) = self.keymap.get(key).cloned() {
            trace!("Key action: {:?}", action);
            return self.execute_action(&action, app);
        }

        trace!("Unbound key: {:?}", key);
        Ok(HandlerAction::Ignored)
    }

    /// Execute a client action
    fn execute_action(&mut self, action: &KeyAction, app: &mut App) -> Result<HandlerAction> {
        use KeyAction::*;

        match action {
            // ===== Text =====
            EnterText => {
                app.handlers.push(Box::new(BufferHandler::new(
                    "Text to synthesize:",
                    Box::new(|text, app| {
                        app.text.set(&text);
                        app.notifier
                            .info(&format!("{} characters", app.text.char_count()));
                        Ok(())
                    }),
                )));
                Ok(HandlerAction::Handled)
            }

            LoadFile => {
                app.handlers.push(Box::new(BufferHandler::new(
                    "Path to a .txt file:",
                    Box::new(|path, app| app.load_text_file(&path)),
                )));
                Ok(HandlerAction::Handled)
            }

            PasteText => {
                let result = app.paste_text();
                report_on_err(app, result);
                Ok(HandlerAction::Handled)
            }

            CopyText => {
                match app.copy_text() {
                    Ok(()) => app.notifier.success("Text copied"),
                    Err(e) => app.report(&e),
                }
                Ok(HandlerAction::Handled)
            }

            SelectRange => {
                app.handlers.push(Box::new(BufferHandler::new(
                    "Selection as 'start end' in characters:",
                    Box::new(|input, app| {
                        let parts: Vec<&str> = input.split_whitespace().collect();
                        let range = match parts.as_slice() {
                            [a, b] => a.parse::<usize>().ok().zip(b.parse::<usize>().ok()),
                            _ => None,
                        };
                        let Some((start, end)) = range else {
                            return Err(TtscError::Validation(
                                "Expected two numbers, e.g. '0 12'".to_string(),
                            ));
                        };
                        if app.text.select(start, end) {
                            app.notifier.info(&format!(
                                "Selected: {}",
                                app.text.selected_text().unwrap_or_default()
                            ));
                            Ok(())
                        } else {
                            Err(TtscError::Validation(format!(
                                "Range {}..{} is not inside the text ({} chars)",
                                start,
                                end,
                                app.text.char_count()
                            )))
                        }
                    }),
                )));
                Ok(HandlerAction::Handled)
            }

            ClearSelection => {
                app.text.clear_selection();
                app.notifier.info("Selection cleared");
                Ok(HandlerAction::Handled)
            }

            // ===== Catalog selection =====
            ChooseLanguage => {
                let Some(catalog) = &app.catalog else {
                    emit("Voice catalog not loaded yet");
                    return Ok(HandlerAction::Handled);
                };
                let languages: Vec<String> =
                    catalog.languages().iter().map(|l| l.to_string()).collect();
                if languages.is_empty() {
                    emit("The catalog has no languages");
                    return Ok(HandlerAction::Handled);
                }
                let chosen = languages.clone();
                app.handlers.push(Box::new(MenuHandler::new(
                    "Languages:",
                    &languages,
                    Box::new(move |index, app| {
                        app.set_language(&chosen[index]);
                        app.show_status();
                        Ok(())
                    }),
                )));
                Ok(HandlerAction::Handled)
            }

            ChooseGender => {
                let items = vec![
                    "female".to_string(),
                    "male".to_string(),
                    "all".to_string(),
                ];
                app.handlers.push(Box::new(MenuHandler::new(
                    "Gender filter:",
                    &items,
                    Box::new(move |index, app| {
                        let gender = match index {
                            0 => GenderFilter::Female,
                            1 => GenderFilter::Male,
                            _ => GenderFilter::All,
                        };
                        app.set_gender(gender);
                        app.show_status();
                        Ok(())
                    }),
                )));
                Ok(HandlerAction::Handled)
            }

            ChooseVoice => {
                let Some((labels, values)) = visible_voice_items(app) else {
                    emit("Choose a language and gender first (l, g)");
                    return Ok(HandlerAction::Handled);
                };
                if labels.is_empty() {
                    emit("No voices available for the current filters");
                    return Ok(HandlerAction::Handled);
                }
                app.handlers.push(Box::new(MenuHandler::new(
                    "Voices:",
                    &labels,
                    Box::new(move |index, app| {
                        if app.set_voice(&values[index]) {
                            app.notifier.info(&format!("Voice: {}", values[index]));
                        }
                        Ok(())
                    }),
                )));
                Ok(HandlerAction::Handled)
            }

            ListVoices => {
                show_visible_voices(app);
                Ok(HandlerAction::Handled)
            }

            // ===== Synthesis =====
            Speak => {
                let result = app.start_speak(false);
                report_on_err(app, result);
                Ok(HandlerAction::Handled)
            }

            SpeakEnhanced => {
                let result = app.start_speak(true);
                report_on_err(app, result);
                Ok(HandlerAction::Handled)
            }

            SampleCurrent => {
                let result = app.sample_current();
                report_on_err(app, result);
                Ok(HandlerAction::Handled)
            }

            SampleMenu => {
                let Some((labels, values)) = visible_voice_items(app) else {
                    emit("Choose a language and gender first (l, g)");
                    return Ok(HandlerAction::Handled);
                };
                if labels.is_empty() {
                    emit("No voices visible");
                    return Ok(HandlerAction::Handled);
                }
                app.handlers.push(Box::new(MenuHandler::new(
                    "Sample which voice?",
                    &labels,
                    Box::new(move |index, app| app.start_sample(&values[index])),
                )));
                Ok(HandlerAction::Handled)
            }

            CheckVoice => {
                match app.selection.voice().map(str::to_string) {
                    Some(voice) => {
                        app.notifier.info(&format!("Validating {}...", voice));
                        app.check_voice(&voice);
                    }
                    None => emit("Select a voice first (v)"),
                }
                Ok(HandlerAction::Handled)
            }

            // ===== Playback and export =====
            PlayPreview => {
                let result = app.play_preview();
                report_on_err(app, result);
                Ok(HandlerAction::Handled)
            }

            StopPlayback => {
                app.player.stop();
                Ok(HandlerAction::Handled)
            }

            DownloadPreview => {
                app.handlers.push(Box::new(BufferHandler::new(
                    "Save audio to path:",
                    Box::new(|dest, app| app.download_preview(&dest)),
                )));
                Ok(HandlerAction::Handled)
            }

            // ===== History and saved files =====
            ShowHistory => {
                app.show_history();
                Ok(HandlerAction::Handled)
            }

            HistoryMenu => {
                if app.history.is_empty() {
                    emit("No session history");
                    return Ok(HandlerAction::Handled);
                }
                let handler = HistoryHandler::new(app);
                app.handlers.push(Box::new(handler));
                Ok(HandlerAction::Handled)
            }

            RefreshSaved => {
                app.refresh_saved();
                Ok(HandlerAction::Handled)
            }

            // ===== Session =====
            Login => {
                app.handlers.push(Box::new(BufferHandler::new(
                    "Email:",
                    Box::new(|email, app| {
                        app.handlers.push(Box::new(BufferHandler::masked(
                            "Password:",
                            Box::new(move |password, app| {
                                if email.trim().is_empty() || password.is_empty() {
                                    return Err(TtscError::Validation(
                                        "Provide email and password".to_string(),
                                    ));
                                }
                                app.notifier.info("Signing in...");
                                app.login(email.trim().to_string(), password);
                                Ok(())
                            }),
                        )));
                        Ok(())
                    }),
                )));
                Ok(HandlerAction::Handled)
            }

            Register => {
                app.handlers.push(Box::new(BufferHandler::new(
                    "Email:",
                    Box::new(|email, app| {
                        app.handlers.push(Box::new(BufferHandler::masked(
                            "Password:",
                            Box::new(move |password, app| {
                                if email.trim().is_empty() || password.is_empty() {
                                    return Err(TtscError::Validation(
                                        "Provide email and password".to_string(),
                                    ));
                                }
                                app.handlers.push(Box::new(BufferHandler::new(
                                    "Full name (optional):",
                                    Box::new(move |name, app| {
                                        app.notifier.info("Creating account...");
                                        app.register(
                                            email.trim().to_string(),
                                            password,
                                            name.trim().to_string(),
                                        );
                                        Ok(())
                                    }),
                                )));
                                Ok(())
                            }),
                        )));
                        Ok(())
                    }),
                )));
                Ok(HandlerAction::Handled)
            }

            Logout => {
                app.logout();
                Ok(HandlerAction::Handled)
            }

            // ===== App =====
            Options => {
                app.handlers.push(Box::new(OptionsHandler::new()));
                Ok(HandlerAction::Handled)
            }

            Status => {
                app.show_status();
                Ok(HandlerAction::Handled)
            }

            ClearAll => {
                app.clear();
                Ok(HandlerAction::Handled)
            }

            Help => {
                show_help();
                Ok(HandlerAction::Handled)
            }

            Quit => Ok(HandlerAction::Quit),
        }
    }
}

/// Report a failed action without letting it end the event loop
fn report_on_err(app: &App, result: Result<()>) {
    if let Err(e) = result {
        app.report(&e);
    }
}

/// Labels and values for the voices visible under the current filters
fn visible_voice_items(app: &App) -> Option<(Vec<String>, Vec<String>)> {
    let catalog = app.catalog.as_ref()?;
    let language = app.selection.language()?.to_string();
    let gender = app.selection.gender()?;
    let cap = app.config.voices_per_group();

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (group, voices) in catalog.filtered_groups(&language, gender, Some(cap)) {
        for voice in voices {
            let gender_tag = if voice.gender.is_empty() {
                String::new()
            } else {
                format!(" ({})", voice.gender)
            };
            labels.push(format!("{}{} — {}", voice.label, gender_tag, group.lang));
            values.push(voice.value.clone());
        }
    }
    Some((labels, values))
}

/// Print the voices the current filters make visible
fn show_visible_voices(app: &App) {
    let Some((labels, values)) = visible_voice_items(app) else {
        emit("Choose a language and gender first (l, g)");
        return;
    };
    if labels.is_empty() {
        emit("No voices visible");
        return;
    }
    emit("Visible voices:");
    for (i, label) in labels.iter().enumerate() {
        let marker = if app.selection.voice() == Some(values[i].as_str()) {
            "*"
        } else if app.sample_loading.as_deref() == Some(values[i].as_str()) {
            "~"
        } else {
            " "
        };
        emit(&format!("{} {:>3}. {}", marker, i + 1, label));
    }
}

fn show_help() {
    emit("Text:      t type   f load .txt   b paste   y copy   m select   M unselect");
    emit("Catalog:   l language   g gender   v voice   c list voices");
    emit("Speech:    s speak   S speak enhanced   a sample   A sample menu   V validate");
    emit("Audio:     p play preview   space stop   d save to file");
    emit("History:   h show   H browse (play/upload/write)   F saved files");
    emit("Session:   L login   R sign up   x logout");
    emit("Other:     o options   i status   C clear   ? help   q quit");
}
