//! Timed-task progress reporting.
//!
//! The pipeline announces each unit of work through a [`Progress`] sink:
//! `post` opens a task with a step budget, `advance` ticks it, and every
//! `post` is balanced by exactly one `complete` or `fail`. Nested tasks
//! (per-import work inside the processing phase) pass a nesting depth and
//! render indented.
//!
//! [`TermProgress`] renders tasks to a terminal with timing; [`SilentProgress`]
//! discards everything (library use); [`Recording`] captures the event
//! sequence for tests.

use std::io::Write;
use std::time::Instant;

use crate::style::Style;

pub trait Progress {
    fn post(&mut self, name: &str, steps: usize, nested: usize);
    fn advance(&mut self);
    fn complete(&mut self);
    fn fail(&mut self, reason: &str);
}

struct Task {
    name: String,
    steps: usize,
    max_steps: usize,
    nested: usize,
    started: Instant,
}

/// Terminal reporter: `[step/max] name ~ elapsed` lines, one per task.
#[derive(Default)]
pub struct TermProgress {
    task: Option<Task>,
}

impl TermProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(nested: usize) -> String {
        let mut s = String::new();
        for _ in 0..nested {
            s.push_str("  ");
        }
        if nested > 0 {
            s.push_str(&Style::bright_black("└─ "));
        }
        s
    }

    fn elapsed(task: &Task) -> String {
        let micros = task.started.elapsed().as_micros();
        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

impl Progress for TermProgress {
    fn post(&mut self, name: &str, steps: usize, nested: usize) {
        self.task = Some(Task {
            name: name.to_string(),
            steps: 0,
            max_steps: steps,
            nested,
            started: Instant::now(),
        });
    }

    fn advance(&mut self) {
        if let Some(task) = &mut self.task {
            task.steps += 1;
            print!(
                "{}{} {}\r",
                Self::indent(task.nested),
                Style::bright_black(&format!("[{}/{}]", task.steps, task.max_steps)),
                Style::bright_blue(&task.name),
            );
            let _ = std::io::stdout().flush();
        }
    }

    fn complete(&mut self) {
        if let Some(task) = self.task.take() {
            println!(
                "{}{} {} {}",
                Self::indent(task.nested),
                Style::bright_green(&format!("[{}/{}]", task.max_steps, task.max_steps)),
                Style::bright_green(&task.name),
                Style::bright_black(&format!("~ {}", Self::elapsed(&task))),
            );
        }
    }

    fn fail(&mut self, reason: &str) {
        if let Some(task) = self.task.take() {
            println!(
                "{}{} {} {}",
                Self::indent(task.nested),
                Style::bright_red(&format!("[{}/{}]", task.steps, task.max_steps)),
                Style::bright_red(&format!("{} [x]", task.name)),
                Style::bright_black(&format!("~ {}", reason)),
            );
        }
    }
}

/// Discards all events.
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn post(&mut self, _name: &str, _steps: usize, _nested: usize) {}
    fn advance(&mut self) {}
    fn complete(&mut self) {}
    fn fail(&mut self, _reason: &str) {}
}

/// Captures the event stream; test support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Post { name: String, steps: usize, nested: usize },
    Advance,
    Complete,
    Fail { reason: String },
}

#[derive(Default)]
pub struct Recording {
    pub events: Vec<ProgressEvent>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every `post` was balanced by exactly one `complete` or
    /// `fail`.
    pub fn balanced(&self) -> bool {
        let posts = self
            .events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Post { .. }))
            .count();
        let closes = self
            .events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Complete | ProgressEvent::Fail { .. }))
            .count();
        posts == closes
    }
}

impl Progress for Recording {
    fn post(&mut self, name: &str, steps: usize, nested: usize) {
        self.events.push(ProgressEvent::Post {
            name: name.to_string(),
            steps,
            nested,
        });
    }

    fn advance(&mut self) {
        self.events.push(ProgressEvent::Advance);
    }

    fn complete(&mut self) {
        self.events.push(ProgressEvent::Complete);
    }

    fn fail(&mut self, reason: &str) {
        self.events.push(ProgressEvent::Fail {
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_tracks_balance() {
        let mut rec = Recording::new();
        rec.post("Lexing", 1, 0);
        rec.advance();
        rec.complete();
        assert!(rec.balanced());

        rec.post("Parsing", 1, 0);
        assert!(!rec.balanced());
        rec.fail("boom");
        assert!(rec.balanced());
    }

    #[test]
    fn silent_progress_accepts_everything() {
        let mut silent = SilentProgress;
        silent.post("x", 3, 1);
        silent.advance();
        silent.complete();
        silent.fail("ignored");
    }
}
