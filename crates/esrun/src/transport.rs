//! # Transport Abstraction
//!
//! A minimal, blocking interface for handing code to the host engine.
//!
//! ## Philosophy
//!
//! - **Text-Oriented**: The Transport knows nothing about tags, proxies, or ids.
//!   It moves one expression out and one reply back.
//! - **Request-Response**: One call in flight at a time. The caller blocks until
//!   the host answers; there is no timeout and no retry.
//! - **No Escaping**: Code arrives already quoted and wrapped by the session.

use std::fmt;
use std::rc::Rc;

/// Errors that occur at the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The host engine raised while evaluating the code.
    Host(String),
    /// The host is unreachable or the connection was dropped.
    ConnectionLost(String),
    /// A reply frame did not follow the framing rules.
    Framing(String),
    /// Generic I/O error or internal transport failure.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(msg) => write!(f, "Host raised: {}", msg),
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::Framing(msg) => write!(f, "Framing error: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// A mechanism to evaluate code in the host and receive its textual reply.
///
/// # invariants
/// - Must return `Ok(reply)` with the raw reply text on success.
/// - Must return `Err(Error::Host)` if the host raised.
/// - Should not interpret the reply (no tag parsing).
pub trait Transport {
    /// Evaluates `code` in the host engine.
    fn execute(&self, code: &str) -> Result<String>;

    /// Opens an undo group through a host-native hook.
    ///
    /// Returns `Ok(false)` when the transport has no such hook, in which case
    /// the caller falls back to scripting it.
    fn begin_undo_group(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }

    /// Closes the innermost undo group through a host-native hook.
    fn end_undo_group(&self) -> Result<bool> {
        Ok(false)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, code: &str) -> Result<String> {
        (**self).execute(code)
    }

    fn begin_undo_group(&self, name: &str) -> Result<bool> {
        (**self).begin_undo_group(name)
    }

    fn end_undo_group(&self) -> Result<bool> {
        (**self).end_undo_group()
    }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn execute(&self, code: &str) -> Result<String> {
        (**self).execute(code)
    }

    fn begin_undo_group(&self, name: &str) -> Result<bool> {
        (**self).begin_undo_group(name)
    }

    fn end_undo_group(&self) -> Result<bool> {
        (**self).end_undo_group()
    }
}
