//! Terminal markdown rendering for answers.
//!
//! Answers are rendered through `termimad` with the green accent used by
//! the web page.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use termimad::MadSkin;
use termimad::crossterm::style::Color;

pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Green);
        skin.headers[0].set_fg(Color::Green);
        skin.headers[1].set_fg(Color::Green);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render a complete markdown answer for the terminal.
    pub fn render_final(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Format: "| {time}s . {model}"
    pub fn print_stats_footer(&self, response_ms: u64, model: &str) {
        let seconds = response_ms as f64 / 1000.0;
        println!(
            "  {} {:.1}s {} {}",
            console::style("|").dim(),
            console::style(seconds).dim(),
            console::style("\u{00b7}").dim(),
            console::style(model).dim(),
        );
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Steady-ticking spinner shown while waiting on the providers.
pub fn thinking_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("  {spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
