//! Async readline input for the chat loop.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// What the user did at the prompt.
#[derive(Debug)]
pub enum InputEvent {
    /// A submitted line, trimmed.
    Message(String),
    /// Ctrl+D.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the handler and a `SharedWriter` for output that should not
    /// clobber the prompt line.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let trimmed = line.trim().to_string();
                if !trimmed.is_empty() {
                    self.rl.add_history_entry(trimmed.clone());
                }
                InputEvent::Message(trimmed)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
