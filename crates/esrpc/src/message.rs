//! # Outbound Messages
//!
//! Every request the bridge makes is one of these shapes, rendered as a single
//! host expression. Rendering is pure; escaping of the whole expression for the
//! dispatch envelope happens later, in [`Dialect::wrap`].
//!
//! Names and class names are spliced as-is. Callers check them with
//! [`crate::dialect::is_identifier`] first.

use crate::Dialect;
use crate::ObjectId;
use crate::dialect::quote;

/// A single outbound request.
#[derive(Clone, Debug, PartialEq)]
pub enum Message<'a> {
    /// `<ref>.<name>;`
    GetAttr { id: &'a ObjectId, name: &'a str },
    /// `setAttr(<id>, "<name>", <value>);`
    SetAttr { id: &'a ObjectId, name: &'a str, value: &'a str },
    /// `callFn(<id>, <args>);`
    CallFunction { id: &'a ObjectId, args: &'a str },
    /// `<ref>.<name>(<args>);`
    CallMethod { id: &'a ObjectId, name: &'a str, args: &'a str },
    /// `<ref>[<index>];`
    Index { id: &'a ObjectId, index: usize },
    /// `<ref> == <ref>;`
    Equals { lhs: &'a ObjectId, rhs: &'a ObjectId },
    /// `deleteObject(<id>);`
    Delete { id: &'a ObjectId },
    /// `new <class>(<args>);`
    Construct { class: &'a str, args: &'a str },
    /// `<name>;`
    Global { name: &'a str },
}

impl Message<'_> {
    /// Renders the message against the dialect's helper names.
    pub fn render(&self, dialect: &Dialect) -> String {
        match self {
            Message::GetAttr { id, name } => format!("{}.{};", dialect.reference(id), name),
            Message::SetAttr { id, name, value } => {
                format!("{}({}, {}, {});", dialect.set_attr, id, quote(name), value)
            }
            Message::CallFunction { id, args } if args.is_empty() => {
                format!("{}({});", dialect.call_fn, id)
            }
            Message::CallFunction { id, args } => format!("{}({}, {});", dialect.call_fn, id, args),
            Message::CallMethod { id, name, args } => {
                format!("{}.{}({});", dialect.reference(id), name, args)
            }
            Message::Index { id, index } => format!("{}[{}];", dialect.reference(id), index),
            Message::Equals { lhs, rhs } => {
                format!("{} == {};", dialect.reference(lhs), dialect.reference(rhs))
            }
            Message::Delete { id } => format!("{}({});", dialect.delete_object, id),
            Message::Construct { class, args } => format!("new {}({});", class, args),
            Message::Global { name } => format!("{};", name),
        }
    }
}
