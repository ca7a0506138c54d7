//! # Dialect
//!
//! The host side of the bridge is a handful of helper functions and one object
//! table living in the host's global scope. Their names are configuration, not
//! protocol, so they are collected here.

use crate::ObjectId;

/// Names of the host-side helpers every outbound message is written against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Global table holding live remote objects, indexed by id.
    pub table: String,
    /// `setAttr(id, "name", value)`.
    pub set_attr: String,
    /// `callFn(id, args...)`.
    pub call_fn: String,
    /// `deleteObject(id)`.
    pub delete_object: String,
    /// Dispatcher that evaluates a quoted expression and tags its result.
    /// `None` hands expressions to the transport unwrapped.
    pub envelope: Option<String>,
    /// Attribute names starting with this marker never leave the client.
    pub private_marker: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            table: "table".into(),
            set_attr: "setAttr".into(),
            call_fn: "callFn".into(),
            delete_object: "deleteObject".into(),
            envelope: Some("dispatch".into()),
            private_marker: '_',
        }
    }
}

impl Dialect {
    /// Renders the reference form of an object: an expression that, evaluated
    /// by the host, resolves to the exact table entry.
    pub fn reference(&self, id: &ObjectId) -> String {
        format!("{}[{}]", self.table, id)
    }

    /// Wraps an expression in the dispatch envelope.
    ///
    /// The expression is quoted here; transports never escape.
    pub fn wrap(&self, code: &str) -> String {
        match &self.envelope {
            Some(envelope) => format!("{}({})", envelope, quote(code)),
            None => code.to_string(),
        }
    }

    pub fn is_private(&self, name: &str) -> bool {
        name.starts_with(self.private_marker)
    }
}

/// Quotes text as a host string literal.
///
/// JSON string grammar, plus escapes for U+2028 and U+2029: both are legal
/// inside JSON strings but terminate lines in older script engines.
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Returns true if `name` can be spliced after a `.` without quoting.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };
    let head = first.is_ascii_alphabetic() || first == '_' || first == '$';
    head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
