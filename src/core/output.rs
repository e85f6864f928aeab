use crate::domain::ports::OutputSink;
use std::io::{BufRead, Empty, Sink, Write};

/// Collects presubmit report text, optionally echoing it to a stream and
/// reading prompt answers from another.
pub struct PresubmitOutput<R = Empty, W = Sink> {
    input: Option<R>,
    output: Option<W>,
    written: Vec<String>,
    error_count: usize,
}

impl PresubmitOutput {
    /// An output with no streams: everything is kept in memory and prompts fail.
    pub fn capture() -> Self {
        Self::new(None, None)
    }
}

impl<R: BufRead, W: Write> PresubmitOutput<R, W> {
    pub fn new(input: Option<R>, output: Option<W>) -> Self {
        Self {
            input,
            output,
            written: Vec::new(),
            error_count: 0,
        }
    }

    pub fn write(&mut self, s: &str) {
        self.written.push(s.to_string());
        if let Some(out) = self.output.as_mut() {
            if let Err(e) = out.write_all(s.as_bytes()) {
                tracing::warn!("Failed to write presubmit output: {}", e);
            }
        }
    }

    pub fn fail(&mut self) {
        self.error_count += 1;
    }

    pub fn should_continue(&self) -> bool {
        self.error_count == 0
    }

    /// Asks `prompt`; anything but `y`/`yes`, or no input stream, fails the output.
    pub fn prompt_yes_no(&mut self, prompt: &str) -> bool {
        self.write(prompt);
        if let Some(out) = self.output.as_mut() {
            let _ = out.flush();
        }

        let mut response = String::new();
        let accepted = match self.input.as_mut() {
            Some(input) => match input.read_line(&mut response) {
                Ok(_) => matches!(response.trim().to_lowercase().as_str(), "y" | "yes"),
                Err(e) => {
                    tracing::warn!("Failed to read prompt answer: {}", e);
                    false
                }
            },
            None => false,
        };

        if !accepted {
            self.fail();
        }
        accepted
    }

    pub fn getvalue(&self) -> String {
        self.written.concat()
    }
}

impl<R: BufRead, W: Write> OutputSink for PresubmitOutput<R, W> {
    fn write(&mut self, s: &str) {
        PresubmitOutput::write(self, s);
    }

    fn fail(&mut self) {
        PresubmitOutput::fail(self);
    }
}
