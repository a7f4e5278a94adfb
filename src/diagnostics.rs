// ABOUTME: Diagnostics accumulator for best-effort failures.
// ABOUTME: Collects problems that must not change a command's outcome but should be shown.

/// Collects non-fatal warnings during a command.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether a warning of the given kind was recorded.
    pub fn has_kind(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// A non-fatal warning.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The service event history could not be read.
    pub fn event_history(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::EventHistory,
            message: message.into(),
        }
    }

    /// A build log endpoint could not be reached.
    pub fn log_endpoint(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LogEndpoint,
            message: message.into(),
        }
    }
}

/// Categories of best-effort failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Event history fetch failed, so build correlation or the event dump is missing.
    EventHistory,
    /// A build log endpoint failed or answered with an error.
    LogEndpoint,
}
