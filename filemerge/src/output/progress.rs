//! Progress events and the terminal progress bar that renders them.
//!
//! A merge run reports milestones through a [`ProgressReporter`]. Any
//! `FnMut(ProgressEvent)` closure is a reporter, so callers can collect,
//! forward or render events however they like.
//!
//! # Examples
//!
//! ```
//! use filemerge::output::progress::{ProgressBar, ProgressEvent, ProgressReporter};
//!
//! let mut bar = ProgressBar::disabled();
//! bar.report(ProgressEvent::new(50, "Merging files..."));
//! assert_eq!(bar.percent(), 50);
//! bar.finish();
//! ```

use serde::Serialize;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// One progress milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Completion percentage, 0 to 100.
    pub percentage: u8,
    /// Human-readable status.
    pub message: String,
}

impl ProgressEvent {
    /// Create an event. Percentages above 100 are clamped.
    pub fn new(percentage: u8, message: impl Into<String>) -> Self {
        Self {
            percentage: percentage.min(100),
            message: message.into(),
        }
    }
}

/// Sink for progress events.
///
/// Called synchronously from the pipeline, zero or more times per run.
pub trait ProgressReporter {
    /// Receive one event.
    fn report(&mut self, event: ProgressEvent);
}

impl<F> ProgressReporter for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Reporter that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Percentage of the acquisition band (0-40) reached before input `index`.
///
/// Rounds half up, so `index / total * 40` behaves like `Math.round`.
pub fn acquisition_percentage(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (80 * index + total) / (2 * total);
    scaled.min(40) as u8
}

/// Terminal progress bar driven by [`ProgressEvent`]s.
pub struct ProgressBar {
    /// Current percentage.
    current: u8,
    /// Optional message to display.
    message: Option<String>,
    /// Start time of the operation.
    start_time: Instant,
    /// Last render time (for rate limiting).
    last_update: Instant,
    /// Minimum time between renders.
    update_interval: Duration,
    /// Whether the progress bar is enabled.
    enabled: bool,
}

impl ProgressBar {
    /// Create a progress bar, enabled when stdout is a terminal.
    pub fn new() -> Self {
        Self {
            current: 0,
            message: None,
            start_time: Instant::now(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(100),
            enabled: Self::is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new();
        pb.enabled = false;
        pb
    }

    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Set the message to display with the progress bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Update the bar to a percentage.
    pub fn update(&mut self, percent: u8) {
        self.current = percent.min(100);

        // Milestones are sparse, but never skip the final render
        if self.last_update.elapsed() < self.update_interval && self.current < 100 {
            return;
        }

        self.last_update = Instant::now();
        self.render();
    }

    /// Mark the progress bar as finished.
    pub fn finish(&mut self) {
        self.current = 100;
        if self.enabled {
            self.render();
            println!();
        }
    }

    /// Reset to zero after a failed run and clear the line.
    pub fn reset(&mut self) {
        self.current = 0;
        self.message = None;
        self.clear();
    }

    /// Clear the progress bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }

        print!("\r\x1b[K{}", self.render_bar());
        io::stdout().flush().ok();
    }

    fn render_bar(&self) -> String {
        let width = 40;
        let filled = width * self.current as usize / 100;
        let empty = width - filled;

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        let mut parts = vec![
            bar,
            format!("{:>3}%", self.current),
            format_duration(self.start_time.elapsed()),
        ];

        if let Some(ref msg) = self.message {
            parts.push(msg.clone());
        }

        parts.join(" ")
    }

    /// Current percentage.
    pub fn percent(&self) -> u8 {
        self.current
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ProgressBar {
    fn report(&mut self, event: ProgressEvent) {
        self.set_message(event.message);
        self.update(event.percentage);
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
