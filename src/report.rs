//! # Progress Reporting
//!
//! Human-readable status lines for whoever launched the migration — a
//! console, a command sender, a log file. The sink has no effect on engine
//! correctness; operator-facing diagnostics also flow through `tracing`
//! independently of it.

use parking_lot::Mutex;

/// Sink for human-readable progress and status lines.
pub trait Reporter {
    /// Accept one status line.
    fn report(&self, message: &str);
}

/// Forwards progress lines to the `tracing` pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, message: &str) {
        tracing::info!(target: "permshift::migration", "{message}");
    }
}

/// Buffers progress lines in memory.
///
/// Test and dry-run support: lets a caller assert on or display the exact
/// lines a pass produced.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    lines: Mutex<Vec<String>>,
}

impl CollectingReporter {
    /// A new, empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, message: &str) {
        self.lines.lock().push(message.to_string());
    }
}
