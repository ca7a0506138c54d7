//! # Error Definitions
//!
//! Wire-level failures. These say the bytes were wrong, never that the host
//! raised; host exceptions belong to the transport.

/// Violations of the reply format or values that have no host expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The reply's leading tag is not one the bridge knows.
    UnknownTag(String),
    /// A known tag arrived without one of its fields.
    MissingField { tag: &'static str, field: &'static str },
    /// The payload of a `number` reply is not a numeric literal.
    MalformedNumber(String),
    /// The payload of a `boolean` reply is neither `true` nor `false`.
    MalformedBool(String),
    /// A client value cannot be written as a host expression.
    Unencodable(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTag(tag) => write!(f, "unknown reply tag '{}'", tag),
            Self::MissingField { tag, field } => {
                write!(f, "'{}' reply is missing its {} field", tag, field)
            }
            Self::MalformedNumber(raw) => write!(f, "malformed number payload '{}'", raw),
            Self::MalformedBool(raw) => write!(f, "malformed boolean payload '{}'", raw),
            Self::Unencodable(what) => write!(f, "cannot encode {} as a host expression", what),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized Result type for wire operations.
pub type Result<T> = std::result::Result<T, Error>;
