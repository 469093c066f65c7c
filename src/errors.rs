//! Unified error types and result handling.
//!
//! Every failure the ledger can hit is a variant here. None of them is fatal:
//! the front end turns each one into a [`Status`](crate::core::status::Status)
//! with the severity reported by [`Error::severity`].

use crate::core::status::Severity;
use thiserror::Error;

/// All errors produced by the mess ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was empty after trimming.
    #[error("{message}")]
    Validation {
        /// What was missing
        message: String,
    },

    /// A student with the same roll number (case-insensitive) already exists.
    #[error("Student with Roll Number {roll_no} already exists.")]
    DuplicateStudent {
        /// The roll number that collided
        roll_no: String,
    },

    /// No student matches the given roll number.
    #[error("Student with Roll Number {roll_no} not found.")]
    StudentNotFound {
        /// The roll number that was looked up
        roll_no: String,
    },

    /// A plan meal was recorded for a student who is not on the monthly plan.
    #[error("Student {name} is not enrolled in the mess. Cannot record plan meal.")]
    NotEnrolled {
        /// Student name
        name: String,
    },

    /// A plan meal reduction was requested while the count is already zero.
    #[error("{name} has no plan meals recorded to reduce.")]
    NothingToReduce {
        /// Student name
        name: String,
    },

    /// An order was placed without any item selected.
    #[error("Please select items and specify quantity to order.")]
    EmptyOrder,

    /// The ledger blob could not be read from or written to the blob store.
    #[error("Persistence error: {message}")]
    Persistence {
        /// Underlying failure
        message: String,
    },

    /// The persisted ledger blob could not be decoded.
    #[error("Corrupt ledger data: {message}")]
    Deserialization {
        /// Decoder failure
        message: String,
    },

    /// Configuration could not be read, parsed or validated.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database driver error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting error while rendering output.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Severity used when this error is shown to the user.
    ///
    /// Precondition failures abort cleanly without touching state, so they are
    /// warnings; everything else is an error.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NotEnrolled { .. } | Self::NothingToReduce { .. } | Self::EmptyOrder => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Builds a validation error from a message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_errors_are_warnings() {
        let errors = [
            Error::NotEnrolled {
                name: "Amit".to_string(),
            },
            Error::NothingToReduce {
                name: "Amit".to_string(),
            },
            Error::EmptyOrder,
        ];
        for err in &errors {
            assert_eq!(err.severity(), Severity::Warning, "{err}");
        }
    }

    #[test]
    fn test_lookup_and_persistence_errors_are_errors() {
        let not_found = Error::StudentNotFound {
            roll_no: "101".to_string(),
        };
        assert_eq!(not_found.severity(), Severity::Error);
        assert_eq!(
            not_found.to_string(),
            "Student with Roll Number 101 not found."
        );

        let persistence = Error::Persistence {
            message: "disk full".to_string(),
        };
        assert_eq!(persistence.severity(), Severity::Error);
    }
}
