//! Type expression parse errors

use thiserror::Error;

/// A grammatically invalid type expression.
///
/// `offset` is the 0-based character index of the offending character in
/// the original input (the first character of a two-character terminator,
/// or the input length when the input ended early).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (at offset {offset})")]
pub struct ParseError {
    /// Human-readable description
    pub message: String,
    /// Character offset into the input
    pub offset: usize,
}

impl ParseError {
    /// Create a new parse error
    #[must_use]
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    /// A character that appeared where the grammar does not allow it
    pub(crate) fn misplaced(c: char, rule: &str, offset: usize) -> Self {
        Self::new(format!("\"{c}\" {rule}"), offset)
    }

    /// A structural type that was opened but never closed
    pub(crate) fn unterminated(kind: &str, terminator: &str, offset: usize) -> Self {
        Self::new(
            format!("unterminated {kind} type — is there a missing '{terminator}' character?"),
            offset,
        )
    }
}
