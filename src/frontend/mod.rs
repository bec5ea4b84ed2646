//! Presentation layer: stands in for the tray menu and status icon.

pub mod console;

pub use console::{parse_line, print_status, read_commands, render_status, ConsoleInput};
