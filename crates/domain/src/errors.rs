//! Domain errors

use thiserror::Error;

/// Errors raised by domain rules
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Utterance text is empty or whitespace-only
    #[error("Utterance text must not be empty")]
    EmptyUtterance,

    /// Text exceeds the maximum length a single utterance may carry
    #[error("Utterance too long: {length} characters exceeds maximum of {max}")]
    UtteranceTooLong {
        /// Length of the provided text
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
}
