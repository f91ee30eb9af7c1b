//! Input handling and key bindings
//!
//! The input system uses a stack-based handler architecture where handlers
//! can be pushed/popped to create modal interfaces (menus, text entry, the
//! options screen, the history browser).

pub mod buffer_handler;
pub mod default_handler;
pub mod handler;
pub mod history_handler;
pub mod keymap;
pub mod menu_handler;
pub mod options_handler;

pub use default_handler::DefaultKeyHandler;
pub use handler::{HandlerAction, HandlerStack, KeyHandler};
pub use keymap::{create_default_keymap, KeyAction};
