//! Diagnostic reporting for the conversion engine.
//!
//! The engine never logs through a global logger. Skip and warning events
//! are emitted through an injected [`Reporter`] so the core stays
//! independently testable: the CLI wires up [`TracingReporter`], tests use
//! [`MemoryReporter`] and assert on what was collected.

use std::sync::Mutex;

/// Sink for skip/warning diagnostics emitted during conversion.
///
/// Implementations must be cheap to call; the engine reports every dropped
/// span and skipped record through this trait.
pub trait Reporter {
    /// An operator-relevant problem: a record or span was dropped.
    fn warn(&self, message: &str);

    /// Low-value detail, e.g. a mention with no configured mapping.
    fn debug(&self, message: &str) {
        let _ = message;
    }
}

/// Forwards diagnostics to the `tracing` subscriber installed by the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }
}

/// Collects diagnostics in memory.
///
/// Used by tests to assert on emitted warnings.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    warnings: Mutex<Vec<String>>,
    debugs: Mutex<Vec<String>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all collected warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("reporter poisoned").clone()
    }

    /// Returns a copy of all collected debug messages.
    pub fn debugs(&self) -> Vec<String> {
        self.debugs.lock().expect("reporter poisoned").clone()
    }

    /// Returns `true` if any collected warning contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings().iter().any(|w| w.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn warn(&self, message: &str) {
        self.warnings
            .lock()
            .expect("reporter poisoned")
            .push(message.to_string());
    }

    fn debug(&self, message: &str) {
        self.debugs
            .lock()
            .expect("reporter poisoned")
            .push(message.to_string());
    }
}
