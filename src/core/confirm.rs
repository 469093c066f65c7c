//! Confirmation capability and mutation outcomes.
//!
//! Delete, reset and order placement stop at a yes/no decision supplied by the
//! caller. The front end asks on stdin; tests pass a fixed answer or a closure.

use crate::errors::Error;

/// A synchronous yes/no decision point.
pub trait Confirm {
    /// Asks the question and blocks until the caller answers.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Result of a mutation that was applied in memory and then saved.
///
/// The change has taken effect even when `save_error` is set; the write
/// failure is reported on its own and the in-memory ledger stays
/// authoritative.
#[derive(Debug)]
pub struct Applied<T> {
    /// Operation-specific result
    pub value: T,
    /// Set when the ledger could not be written to the blob store
    pub save_error: Option<Error>,
}

impl<T> Applied<T> {
    pub(crate) const fn new(value: T, save_error: Option<Error>) -> Self {
        Self { value, save_error }
    }

    /// Whether the change also reached the blob store.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Result of an operation gated by a confirmation.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The caller said yes and the mutation ran
    Completed(Applied<T>),
    /// The caller said no; nothing changed
    Cancelled,
}

impl<T> Outcome<T> {
    /// Whether the caller declined.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_confirm_sees_prompt() {
        let mut seen = Vec::new();
        let mut confirm = |prompt: &str| {
            seen.push(prompt.to_string());
            false
        };
        assert!(!confirm.confirm("Delete?"));
        assert_eq!(seen, vec!["Delete?".to_string()]);
    }

    #[test]
    fn test_fixed_answer() {
        assert!(FixedAnswer(true).confirm("anything"));
        assert!(!FixedAnswer(false).confirm("anything"));
    }
}
