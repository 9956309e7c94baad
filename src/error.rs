//! Validation and parsing errors.
//!
//! The engine itself is infallible for well-typed input; these only surface
//! when checking holdings produced by an importer or parsing identifiers.

/// Returned by [`Holding::validate`](crate::Holding::validate).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HoldingError {
    /// Instrument code is empty.
    #[error("instrument code must not be empty")]
    EmptyCode,
    /// A unit price or value is NaN or infinite.
    #[error("{field} of {code} is not finite")]
    NonFinite { code: String, field: &'static str },
    /// A unit price or value is below zero.
    #[error("{field} of {code} is negative")]
    Negative { code: String, field: &'static str },
}

/// Returned when a string is not a known asset class identifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset class: {0:?}")]
pub struct ParseAssetClassError(pub String);
