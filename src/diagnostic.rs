//! Diagnostics and the sinks that receive them.
//!
//! Validation and resolution never fail loudly. Every decision point
//! produces a `Diagnostic` instead, which is handed to a
//! [`DiagnosticSink`]. The default sink forwards to `tracing`.

use crate::error::{DefinitionError, LineError, ResolutionMiss};
use crate::var_name::VarName;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Trace of a normal decision (entry, exit, chosen branch).
    Info,
    /// Recoverable misconfiguration; something was dropped or is suspicious.
    Warning,
    /// A variable was rejected or could not be resolved.
    Error,
}

/// A single advisory log record.
///
/// Diagnostics never alter control flow. They carry enough context
/// (variable, player, message) for an operator to find the broken entry.
///
/// # Examples
///
/// ```rust
/// use loreroll::{Diagnostic, Severity, VarName};
///
/// let diag = Diagnostic::warning("weights do not sum to 1.0")
///     .with_variable(VarName::from_str("atk"));
/// assert_eq!(diag.severity, Severity::Warning);
/// assert_eq!(diag.to_string(), "[warning] atk: weights do not sum to 1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<VarName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            variable: None,
            player: None,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Attach the variable this diagnostic is about.
    pub fn with_variable(mut self, variable: VarName) -> Self {
        self.variable = Some(variable);
        self
    }

    /// Attach the acting player, if there is one.
    pub fn with_player(mut self, player: Option<&str>) -> Self {
        self.player = player.map(str::to_string);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{level}] ")?;
        if let Some(variable) = &self.variable {
            write!(f, "{variable}: ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(player) = &self.player {
            write!(f, " (player: {player})")?;
        }
        Ok(())
    }
}

impl From<LineError> for Diagnostic {
    fn from(err: LineError) -> Self {
        Diagnostic::warning(err.to_string())
    }
}

impl From<DefinitionError> for Diagnostic {
    fn from(err: DefinitionError) -> Self {
        Diagnostic::new(err.severity(), err.to_string())
    }
}

impl From<ResolutionMiss> for Diagnostic {
    fn from(err: ResolutionMiss) -> Self {
        Diagnostic::error(err.to_string())
    }
}

/// Receiver of diagnostics.
///
/// Implemented for any `Fn(&Diagnostic) + Send + Sync`, so a closure is
/// enough to plug into a host logger.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn emit(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Forwards diagnostics as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        let variable = diagnostic.variable.as_ref().map(VarName::as_str);
        let player = diagnostic.player.as_deref();
        match diagnostic.severity {
            Severity::Info => {
                tracing::debug!(variable, player, "{}", diagnostic.message)
            }
            Severity::Warning => {
                tracing::warn!(variable, player, "{}", diagnostic.message)
            }
            Severity::Error => {
                tracing::error!(variable, player, "{}", diagnostic.message)
            }
        }
    }
}

/// Buffers every diagnostic it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything collected so far, leaving the buffer empty.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.entries.lock().push(diagnostic.clone());
    }
}
