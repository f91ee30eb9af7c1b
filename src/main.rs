//! ttsc main entry point
//!
//! The client's main loop monitors two sources:
//! 1. stdin (user keyboard input) - dispatched through the key handlers
//! 2. the job channel - completed network requests, applied to the state
//!
//! Network jobs run on their own threads, so the loop polls stdin with a
//! short timeout and drains finished jobs between keystrokes.

use anyhow::Context;
use log::{debug, error, info};
use mio::{Events, Interest, Poll, Token};
use nix::libc;
use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};
use std::process;
use std::sync::mpsc::Receiver;
use std::time::Duration;
use ttsc::input::{create_default_keymap, DefaultKeyHandler, HandlerAction};
use ttsc::jobs::{self, JobOutcome};
use ttsc::platform::is_wsl;
use ttsc::state::config::Config;
use ttsc::state::App;
use ttsc::term::{restore_termios, set_raw_mode};
use ttsc::view::emit;

/// Token for stdin in mio poll
const STDIN: Token = Token(0);

/// Poll timeout; bounds how long a finished job waits to be applied
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    // Initialize logger
    if debug_mode {
        // Debug mode: write to ttsc.log file
        use std::fs::OpenOptions;
        match OpenOptions::new().create(true).append(true).open("ttsc.log") {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open ttsc.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "ttsc version {} starting (debug mode, logging to ttsc.log)",
            ttsc::VERSION
        );
    } else {
        // Normal mode: minimal logging to stderr, only errors
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    // Run the application
    if let Err(e) = run() {
        error!("Fatal error: {}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    debug!("Initializing ttsc");

    // Verify stdin is a TTY; the client is an interactive program
    let stdin_fd = io::stdin().as_raw_fd();
    if unsafe { libc::isatty(stdin_fd) } == 0 {
        eprintln!("Error: ttsc requires an interactive terminal (stdin is not a TTY)");
        eprintln!("Usage: Run ttsc directly in a terminal, not through pipes or redirects");
        process::exit(1);
    }

    // Raw mode lets us read single keypresses; restored on exit by the guard
    let original_termios = set_raw_mode(stdin_fd).context("failed to enter raw mode")?;
    let _guard = TermiosGuard {
        fd: stdin_fd,
        termios: original_termios,
    };

    // Load configuration and initialize state
    let config = Config::load().context("failed to load configuration")?;
    info!("Configuration loaded from {:?}", config.path());

    let (runner, outcomes) = jobs::runner();
    let mut app = App::new(config, runner).context("failed to initialize")?;

    // Key handler for top-level commands
    let keymap = create_default_keymap();
    info!("Key handler initialized with {} bindings", keymap.len());
    let mut default_handler = DefaultKeyHandler::new(keymap);

    emit(&format!(
        "ttsc {} — text-to-speech studio client",
        ttsc::VERSION
    ));
    emit(&format!("Server: {}", app.client.base_url()));
    emit(&format!("Config: {}", app.config.path().display()));
    emit("Press ? for help, q to quit");

    // Fetch the catalog and restore any cached session
    app.bootstrap();

    // WSL doesn't support epoll on TTY file descriptors, so use select()
    let use_select = is_wsl();

    let mut mio_poll = if !use_select {
        debug!("Using mio::Poll for event loop");
        let poll = Poll::new()?;

        let mut stdin_source = mio::unix::SourceFd(&stdin_fd);
        poll.registry()
            .register(&mut stdin_source, STDIN, Interest::READABLE)?;

        Some((poll, Events::with_capacity(8)))
    } else {
        debug!("Using select() for event loop (WSL mode)");
        None
    };

    info!("ttsc ready - entering event loop");

    // Main event loop
    loop {
        // Apply any finished network jobs first
        drain_outcomes(&outcomes, &mut app);

        let stdin_ready = if use_select {
            select_stdin(stdin_fd)?
        } else if let Some((ref mut poll, ref mut events)) = mio_poll {
            match poll.poll(events, Some(POLL_INTERVAL)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
            events.iter().any(|event| event.token() == STDIN)
        } else {
            false
        };

        if stdin_ready && handle_stdin(&mut app, &mut default_handler)? {
            emit("Bye");
            return Ok(());
        }
    }
}

/// Apply every job outcome that has arrived
fn drain_outcomes(outcomes: &Receiver<JobOutcome>, app: &mut App) {
    while let Ok(outcome) = outcomes.try_recv() {
        app.apply(outcome);
    }
}

/// Wait for stdin with select(), WSL fallback
fn select_stdin(stdin_fd: RawFd) -> anyhow::Result<bool> {
    use nix::sys::select::{select, FdSet};
    use nix::sys::time::{TimeVal, TimeValLike};
    use std::os::unix::io::BorrowedFd;

    let stdin_borrowed = unsafe { BorrowedFd::borrow_raw(stdin_fd) };

    let mut read_fds = FdSet::new();
    read_fds.insert(stdin_borrowed);

    let mut timeout = TimeVal::milliseconds(POLL_INTERVAL.as_millis() as i64);

    match select(None, Some(&mut read_fds), None, None, Some(&mut timeout)) {
        Ok(_) => Ok(read_fds.contains(stdin_borrowed)),
        Err(nix::errno::Errno::EINTR) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("select() failed: {}", e)),
    }
}

/// Handle user input from stdin
///
/// Modal handlers (menus, line input) get the key first; otherwise the
/// default bindings run. Returns true when the user quit.
fn handle_stdin(app: &mut App, default_handler: &mut DefaultKeyHandler) -> anyhow::Result<bool> {
    let mut buf = [0u8; 1024];

    let n = io::stdin().read(&mut buf)?;
    if n == 0 {
        return Ok(false);
    }

    let input = &buf[..n];

    // Process through the handler stack if a modal handler is active
    if !app.handlers.is_empty() {
        // Temporarily pop the handler to avoid borrowing app twice
        if let Some(mut handler) = app.handlers.pop() {
            let depth_before = app.handlers.len();
            // A failing action is reported, never fatal; the handler stays
            let action = match handler.process_with_app(input, app) {
                Ok(action) => action,
                Err(e) => {
                    app.report(&e);
                    HandlerAction::Handled
                }
            };

            match action {
                HandlerAction::Remove => {
                    // Handler removed itself, don't push back
                }
                _ => {
                    // Push the handler back, under any nested prompts it
                    // pushed itself (those must stay on top)
                    let pushed = app.handlers.len().saturating_sub(depth_before);
                    let mut nested = Vec::with_capacity(pushed);
                    for _ in 0..pushed {
                        if let Some(h) = app.handlers.pop() {
                            nested.push(h);
                        }
                    }
                    app.handlers.push(handler);
                    while let Some(h) = nested.pop() {
                        app.handlers.push(h);
                    }
                }
            }
        }
        return Ok(false);
    }

    // No modal handlers - run the default bindings
    match default_handler.process_key(input, app) {
        Ok(HandlerAction::Quit) => Ok(true),
        Ok(_) => Ok(false),
        Err(e) => {
            app.report(&e);
            Ok(false)
        }
    }
}

/// RAII guard to restore terminal on exit
///
/// Ensures the terminal always returns to normal mode, even on panic
struct TermiosGuard {
    fd: RawFd,
    termios: libc::termios,
}

impl Drop for TermiosGuard {
    fn drop(&mut self) {
        restore_termios(self.fd, &self.termios);
        debug!("Terminal attributes restored");
    }
}
