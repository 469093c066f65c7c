//! User-facing status messages.
//!
//! Operations never surface faults directly; the front end reports every
//! outcome as a short message tagged with a severity.

use crate::errors::Error;
use std::fmt;

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information (e.g. a cancelled prompt)
    Info,
    /// The operation completed
    Success,
    /// The operation was refused because a precondition did not hold
    Warning,
    /// The operation failed
    Error,
}

impl Severity {
    /// Lowercase label used when rendering the message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A message for the user together with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Severity tag
    pub severity: Severity,
    /// Message text
    pub message: String,
}

impl Status {
    /// Creates a status with the given severity.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Creates an info status.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Creates a success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Creates a warning status.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates an error status.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

impl From<&Error> for Status {
    fn from(err: &Error) -> Self {
        Self::new(err.severity(), err.to_string())
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.label(), self.message)
    }
}
