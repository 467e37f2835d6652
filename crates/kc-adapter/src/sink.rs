//! Line-oriented log sinks.

use parking_lot::Mutex;

/// Destination for bootstrap status lines.
pub trait LogSink: Send + Sync {
    /// Writes a single line.
    fn write_line(&self, line: &str);
}

/// Sink that emits each line as an info-level tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!("{line}");
    }
}

/// Sink that prints each line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Sink that keeps lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

impl<S: LogSink + ?Sized> LogSink for std::sync::Arc<S> {
    fn write_line(&self, line: &str) {
        (**self).write_line(line);
    }
}
