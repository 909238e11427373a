//! Progress rotor shown while the workflow runs.
//!
//! Messages rotate on a fixed cadence independent of the request. The
//! display is dismissed on the first tick at which every message has had
//! its full slot AND the request has completed.

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

/// Rotation cadence
pub const ROTOR_INTERVAL: Duration = Duration::from_millis(2500);

pub const ROTOR_MESSAGES: &[&str] = &[
    "Sending notes to the workflow...",
    "Reading through the notes...",
    "Pulling out commitments and open items...",
    "Writing the bottom line...",
    "Almost there...",
];

/// Where rotor messages go
pub trait ProgressSink {
    fn show(&mut self, message: &str);
    fn finish(&mut self);
}

pub struct ProgressRotor {
    messages: Vec<String>,
    interval: Duration,
}

impl ProgressRotor {
    pub fn new(messages: &[&str], interval: Duration) -> Self {
        Self {
            messages: messages.iter().map(|m| m.to_string()).collect(),
            interval,
        }
    }

    /// Drive `work` to completion while rotating messages into `sink`
    pub async fn run_until<F>(&self, sink: &mut dyn ProgressSink, work: F) -> F::Output
    where
        F: Future,
    {
        if self.messages.is_empty() {
            let output = work.await;
            sink.finish();
            return output;
        }

        let mut work = std::pin::pin!(work);
        let mut ticker = tokio::time::interval(self.interval);
        let mut shown = 0usize;
        let mut output = None;

        // Dismissal happens only on a tick
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if shown >= self.messages.len() {
                        if let Some(out) = output.take() {
                            sink.finish();
                            return out;
                        }
                    }
                    sink.show(&self.messages[shown % self.messages.len()]);
                    shown += 1;
                }
                out = &mut work, if output.is_none() => {
                    output = Some(out);
                }
            }
        }
    }
}

impl Default for ProgressRotor {
    fn default() -> Self {
        Self::new(ROTOR_MESSAGES, ROTOR_INTERVAL)
    }
}

/// Spinner on a TTY, plain stderr lines otherwise
pub struct TerminalSink {
    bar: Option<ProgressBar>,
}

impl TerminalSink {
    pub fn new() -> Self {
        if !std::io::stderr().is_terminal() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg:.dim}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar: Some(bar) }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalSink {
    fn show(&mut self, message: &str) {
        match &self.bar {
            Some(bar) => bar.set_message(message.to_string()),
            None => eprintln!("[notes]  ... {}", message),
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
