//! # ESRPC
//!
//! The wire layer of a bridge into a host application's scripting engine.
//!
//! ## Architecture
//!
//! Everything that crosses the runtime boundary is text. Outbound messages are
//! single host expressions; inbound replies are comma-delimited records with the
//! type tag first. This crate owns both directions and never talks to a host:
//!
//! - [`reply`]: classifies a raw reply into a [`Reply`].
//! - [`literal`]: encodes client values into one host expression, splicing
//!   remote references in unquoted.
//! - [`message`]: renders the fixed outbound message shapes.
//! - [`dialect`]: names of the host-side helpers the messages call.

pub mod dialect;
pub mod error;
pub mod literal;
pub mod message;
pub mod reply;

pub use dialect::Dialect;
pub use error::Error;
pub use error::Result;
pub use literal::Literal;
pub use message::Message;
pub use reply::Reply;


/// Opaque handle to an entry in the host-side object table.
///
/// The host owns the entry; holding an `ObjectId` says nothing about whether
/// the entry is still alive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
