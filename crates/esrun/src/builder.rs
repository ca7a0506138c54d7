//! # Session Builder
//!
//! Provides a fluent API for configuring a session before it talks to a host.

use esrpc::Dialect;

use crate::classes::ClassTable;
use crate::classes::Constructor;
use crate::session::Session;
use crate::transport::Transport;

/// Fluent builder for a [`Session`].
pub struct SessionBuilder {
    transport: Box<dyn Transport>,
    dialect: Dialect,
    classes: ClassTable,
}

impl SessionBuilder {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            dialect: Dialect::default(),
            classes: ClassTable::default(),
        }
    }

    /// Replaces the names of the host-side helpers.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the dispatch envelope. `None` sends expressions unwrapped.
    pub fn envelope(mut self, envelope: Option<&str>) -> Self {
        self.dialect.envelope = envelope.map(str::to_string);
        self
    }

    /// Replaces the whole class table.
    pub fn class_table(mut self, classes: ClassTable) -> Self {
        self.classes = classes;
        self
    }

    pub fn register(mut self, tag: impl Into<String>, constructor: Constructor) -> Self {
        self.classes.register(tag, constructor);
        self
    }

    pub fn register_array(mut self, tag: impl Into<String>) -> Self {
        self.classes.register_array(tag);
        self
    }

    pub fn build(self) -> Session {
        Session::from_parts(self.transport, self.dialect, self.classes)
    }
}
