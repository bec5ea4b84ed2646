//! Alert presentation.
//!
//! # Responsibilities
//! - Show the acknowledgment surface described by `[UI]`
//! - Block the caller until the user acknowledges
//!
//! # Variants
//! - `ConsolePresenter`: renders a colored banner on the terminal and waits
//!   for the console front-end to call `acknowledge()`
//! - `HeadlessPresenter`: logs the alert and returns immediately

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::config::UiConfig;

/// Capability that presents an alert and resolves once it is acknowledged.
pub trait AlertPresenter: Send + Sync {
    fn present<'a>(&'a self, ui: &'a UiConfig) -> BoxFuture<'a, ()>;
}

/// Returns immediately; the alert is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPresenter;

impl AlertPresenter for HeadlessPresenter {
    fn present<'a>(&'a self, ui: &'a UiConfig) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::info!(title = %ui.window_title, "{}", ui.message_text);
        })
    }
}

/// Terminal alert acknowledged through [`ConsolePresenter::acknowledge`].
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    pending: Mutex<Option<oneshot::Sender<()>>>,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acknowledge the open alert. Returns false if none is open.
    pub fn acknowledge(&self) -> bool {
        match self.pending.lock().take() {
            Some(ack) => ack.send(()).is_ok(),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

impl AlertPresenter for ConsolePresenter {
    fn present<'a>(&'a self, ui: &'a UiConfig) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let (ack_tx, ack_rx) = oneshot::channel();
            *self.pending.lock() = Some(ack_tx);

            println!("{}", render_banner(ui));
            let _ = ack_rx.await;
        })
    }
}

/// Render the alert as a framed block sized from the window geometry.
pub fn render_banner(ui: &UiConfig) -> String {
    let width = (ui.window_width / 10).max(ui.message_text.chars().count() as u32 + 4) as usize;
    let height = (ui.window_height / 50).max(3) as usize;
    let reset = "\x1b[0m";
    let fill = format!(
        "{}{}{}",
        ansi_background(&ui.alert_color),
        ansi_foreground(&ui.text_color),
        if ui.style.contains("bold") { "\x1b[1m" } else { "" }
    );

    let blank = format!("{fill}{}{reset}", " ".repeat(width));
    let mut lines = Vec::with_capacity(height + 3);
    lines.push(format!("== {} ==", ui.window_title));
    for row in 0..height {
        if row == height / 2 {
            lines.push(format!("{fill}{:^width$}{reset}", ui.message_text));
        } else {
            lines.push(blank.clone());
        }
    }
    lines.push(format!(
        "{}{}[ OK ]{reset}  type 'ok' and press Enter to acknowledge",
        ansi_background(&ui.button_color),
        ansi_foreground(&ui.text_color),
    ));
    lines.join("\n")
}

fn ansi_background(color: &str) -> String {
    parse_color(color)
        .map(|(r, g, b)| format!("\x1b[48;2;{r};{g};{b}m"))
        .unwrap_or_default()
}

fn ansi_foreground(color: &str) -> String {
    parse_color(color)
        .map(|(r, g, b)| format!("\x1b[38;2;{r};{g};{b}m"))
        .unwrap_or_default()
}

/// `#RRGGBB` or one of the basic color names.
fn parse_color(color: &str) -> Option<(u8, u8, u8)> {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some((channel(0)?, channel(2)?, channel(4)?));
    }
    match color.to_ascii_lowercase().as_str() {
        "white" => Some((255, 255, 255)),
        "black" => Some((0, 0, 0)),
        "red" => Some((255, 0, 0)),
        "green" => Some((0, 128, 0)),
        "yellow" => Some((255, 255, 0)),
        _ => None,
    }
}
