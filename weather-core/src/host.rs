//! Narrow interfaces onto the host chat application.

use std::time::Duration;

use crate::WeatherSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing notifications (toasts). `duration` overrides the host default.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str, duration: Option<Duration>);

    fn info(&self, message: &str, duration: Option<Duration>) {
        self.notify(Severity::Info, message, duration);
    }

    fn success(&self, message: &str, duration: Option<Duration>) {
        self.notify(Severity::Success, message, duration);
    }

    fn warning(&self, message: &str, duration: Option<Duration>) {
        self.notify(Severity::Warning, message, duration);
    }

    fn error(&self, message: &str, duration: Option<Duration>) {
        self.notify(Severity::Error, message, duration);
    }
}

/// A host-owned text blob: the author's note or the chat compose box.
///
/// A field that does not exist yet reads as empty. Any other failure is an
/// error, and the session then leaves the field untouched.
pub trait TextField: Send + Sync {
    fn read(&self) -> anyhow::Result<String>;
    fn write(&self, text: String);
}

/// Renders the current snapshot, or an empty state when there is none.
pub trait WeatherDisplay: Send + Sync {
    fn render(&self, snapshot: Option<&WeatherSnapshot>, use_celsius: bool);
}
