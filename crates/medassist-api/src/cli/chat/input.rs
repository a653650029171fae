//! Async readline input for the consultation loop.
//!
//! Wraps `rustyline_async::Readline` so the loop can await a line while
//! still reacting to connectivity changes.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a line (trimmed).
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create the input handler. The returned `SharedWriter` prints above
    /// the prompt without corrupting it.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub fn update_prompt(&mut self, prompt: &str) {
        if let Err(err) = self.rl.update_prompt(prompt) {
            tracing::debug!(error = %err, "Failed to update prompt");
        }
    }

    /// Wait for the next line or control event.
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
            Err(err) => {
                tracing::debug!(error = %err, "Readline failed, treating as EOF");
                InputEvent::Eof
            }
        }
    }

    pub fn clear(&mut self) {
        if let Err(err) = self.rl.clear() {
            tracing::debug!(error = %err, "Failed to clear screen");
        }
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
