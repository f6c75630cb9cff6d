//! Diagnostic output capability.
//!
//! Components that need to report something (a dropped table row, a
//! missing theme template) receive a [`Diagnostics`] handle instead of
//! logging through process-global state. The default implementation
//! forwards to the `log` facade; tests use [`CollectingDiagnostics`].

use std::sync::{Arc, Mutex};

/// Sink for non-fatal diagnostic messages.
pub trait Diagnostics: Send + Sync {
    /// Report a recoverable problem.
    fn warn(&self, message: &str);

    /// Report detail useful when tracing a conversion.
    fn debug(&self, message: &str) {
        let _ = message;
    }
}

/// Forwards diagnostics to the `log` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }
}

/// Severity of a collected message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warn,
    Debug,
}

/// Records every message it receives.
///
/// # Example
///
/// ```
/// use afmdocs_core::{CollectingDiagnostics, Diagnostics};
///
/// let diagnostics = CollectingDiagnostics::new();
/// diagnostics.warn("theme missing");
/// assert_eq!(diagnostics.warnings(), vec!["theme missing".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    messages: Mutex<Vec<(Level, String)>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared handle, ready to inject.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// All messages in the order they were reported.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Only the warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }
}

/// The default diagnostics handle.
pub fn default_diagnostics() -> Arc<dyn Diagnostics> {
    Arc::new(LogDiagnostics)
}
