//! Structured diagnostic channel for rule evaluation
//!
//! Rule failures are local and non-fatal: a malformed or inapplicable
//! rule element reports itself here and the cycle keeps running. The
//! host decides whether to surface or discard the collected entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// A rule's preconditions for contributing were unmet (soft omission)
    Warning,
    /// A rule failed validation and was marked ignored
    Error,
}

/// One diagnostic entry produced during a data-preparation cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Label of the rule (or component) that produced this entry
    pub source: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}: {}", tag, self.source, self.message)
    }
}

/// Ordered collection of diagnostics from one cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a soft omission
    pub fn warn(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            source: source.into(),
            message: message.into(),
        });
    }

    /// Record a validation failure
    pub fn error(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            source: source.into(),
            message: message.into(),
        });
    }

    /// All entries in emission order
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Entries at a given severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.severity == severity)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("RuleA", "missing label");
        diagnostics.error("RuleB", "bad selector");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.entries()[0].severity, Severity::Warning);
        assert_eq!(diagnostics.entries()[1].severity, Severity::Error);
        assert_eq!(diagnostics.with_severity(Severity::Error).count(), 1);
    }

    #[test]
    fn test_display() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error("BaseSpeed", "Unrecognized or missing selector");
        let text = diagnostics.entries()[0].to_string();
        assert_eq!(text, "[error] BaseSpeed: Unrecognized or missing selector");
    }
}
