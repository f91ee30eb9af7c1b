//! User-facing notifications
//!
//! All failures in the client are local and non-fatal: they surface here as
//! messages and the user re-triggers the action. The trait separates error
//! classification (which variant, what detail) from presentation, so tests
//! can capture messages and alternative front ends can render them their
//! own way.

use crate::view::emit;
use crate::TtscError;

/// Notification sink for user-facing messages
pub trait Notifier {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);

    /// Report a failure
    ///
    /// Implementations get the typed error, not a pre-rendered string, so
    /// per-kind presentation (synthesis attempts, auth hints) happens in one
    /// place.
    fn error(&self, error: &TtscError);
}

/// Notifier printing to the terminal
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        emit(message);
    }

    fn success(&self, message: &str) {
        emit(&format!("ok: {}", message));
    }

    fn warn(&self, message: &str) {
        emit(&format!("warning: {}", message));
    }

    fn error(&self, error: &TtscError) {
        match error {
            TtscError::Synthesis { message, attempts } => {
                emit(&format!("error: Speech generation failed: {}", message));
                // Per-attempt diagnostics from the server, shown verbatim
                if !attempts.is_empty() {
                    emit("Attempts:");
                    for (i, attempt) in attempts.iter().enumerate() {
                        emit(&format!("  {}. {}", i + 1, attempt.describe()));
                    }
                }
            }
            TtscError::Auth(message) => {
                emit(&format!("error: {}", message));
                emit("Use L to login or R to create an account.");
            }
            TtscError::Validation(message) => {
                emit(&format!("error: {}", message));
            }
            other => {
                emit(&format!("error: {}", other));
            }
        }
    }
}
