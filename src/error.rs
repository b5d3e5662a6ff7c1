//! The error type shared by the parser, the serializer and the entry points.

use thiserror::Error;

/// Any failure raised while encoding or decoding JSON.
///
/// Decoding is fail-fast: the first offending token aborts the whole
/// operation, there is no partial-result recovery.
#[derive(Debug, Error)]
pub enum JsonError {
    /// A specific character was required at the cursor but something else
    /// (or the end of input) was found.
    #[error("`{0}` expected")]
    Expected(char),

    /// A digit was required, e.g. after a leading `-` or inside an exponent.
    #[error("digit expected")]
    DigitExpected,

    /// The input ended in the middle of a value.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// The cursor sits on a character that cannot start a JSON value.
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),

    /// A backslash escape other than the eight supported ones.
    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),

    /// A malformed `\uXXXX` escape, including an unpaired surrogate half.
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,

    /// A token was read successfully but could not be coerced into the
    /// declared target type.
    #[error("cannot convert `{text}` into `{target}`")]
    Unconvertible {
        text: String,
        target: &'static str,
    },

    /// A structural token (object or array) arrived for a target of an
    /// incompatible kind.
    #[error("a JSON {token} cannot be decoded into `{target}`")]
    MismatchedTarget {
        token: &'static str,
        target: &'static str,
    },

    /// `null` arrived for a target that has no null representation.
    #[error("value of type `{0}` can not be null")]
    InvalidNull(&'static str),

    /// A value whose runtime type matches no serialization rule.
    #[error("unknown object type `{0}`")]
    UnsupportedType(&'static str),

    /// The underlying reader or writer failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
