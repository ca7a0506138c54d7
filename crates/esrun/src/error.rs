//! # Bridge Errors
//!
//! Everything a proxy operation can fail with. Disposal never surfaces here;
//! its failures are logged and dropped.

use esrpc::ObjectId;

use crate::transport;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The host raised, or the transport could not reach it.
    Transport(transport::Error),
    /// The reply broke the wire format, or a value had no host expression.
    Protocol(esrpc::Error),
    /// The host reports that the receiver has no such member.
    NoSuchMember { class: String, name: String },
    /// The host has no such global, or raised while reading it.
    NoSuchGlobal { name: String, reason: String },
    /// The proxy was already disposed; nothing was sent.
    Disposed(ObjectId),
    /// A value was not of the kind the caller asked for.
    TypeMismatch { expected: &'static str, found: &'static str },
    /// A member, global or class name that cannot be spliced into code.
    InvalidName(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Protocol(e) => write!(f, "Bridge protocol error: {}", e),
            Self::NoSuchMember { class, name } => {
                write!(f, "No such remote member: {}.{}", class, name)
            }
            Self::NoSuchGlobal { name, reason } => {
                write!(f, "Host has no global '{}': {}", name, reason)
            }
            Self::Disposed(id) => write!(f, "Proxy for object {} was already disposed", id),
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Self::InvalidName(name) => write!(f, "'{}' is not a valid member name", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

impl From<transport::Error> for Error {
    fn from(e: transport::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<esrpc::Error> for Error {
    fn from(e: esrpc::Error) -> Self {
        Self::Protocol(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_name(name: &str) -> Result<()> {
    if esrpc::dialect::is_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
