//! # Replies
//!
//! Classifies the host's textual reply.
//!
//! ## Format
//!
//! `<tag>[,<field>...]`, split on [`DELIMITER`]:
//!
//! | Reply                      | Meaning                      |
//! |----------------------------|------------------------------|
//! | empty or `null`            | no value                     |
//! | `undefined`                | member absent                |
//! | `boolean,<true\|false>`    | boolean                      |
//! | `number,<literal>`         | integer or real              |
//! | `string,<text>`            | text, verbatim               |
//! | `function,<ignored>,<id>`  | top-level function reference |
//! | `object,<class>,<id>`      | object reference             |
//!
//! ## Invariants
//! - **Panic Safety**: Decoding returns `Result` for every input.
//! - **Strictness**: Unknown tags and malformed payloads are errors, never coerced.

use crate::ObjectId;
use crate::error::Error;
use crate::error::Result;

/// Separates the tag from its fields.
pub const DELIMITER: char = ',';

const STRING_PREFIX: &str = "string,";

/// A decoded reply. Borrowed text points into the raw reply.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<'a> {
    Null,
    Undefined,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(&'a str),
    Function { id: ObjectId },
    Object { class: &'a str, id: ObjectId },
}

impl<'a> Reply<'a> {
    /// Decodes a raw reply.
    pub fn decode(raw: &'a str) -> Result<Self> {
        if raw.is_empty() || raw == "null" {
            return Ok(Reply::Null);
        }

        let mut fields = raw.split(DELIMITER);
        let tag = fields.next().unwrap_or_default();

        match tag {
            "undefined" => Ok(Reply::Undefined),
            "boolean" => match fields.next() {
                Some("true") => Ok(Reply::Bool(true)),
                Some("false") => Ok(Reply::Bool(false)),
                Some(other) => Err(Error::MalformedBool(other.to_string())),
                None => Err(Error::MissingField { tag: "boolean", field: "value" }),
            },
            "number" => {
                let literal = fields.next().ok_or(Error::MissingField { tag: "number", field: "value" })?;
                decode_number(literal)
            }
            // Only the leading tag is stripped. A payload that itself starts
            // with "string," keeps that text.
            "string" => raw
                .strip_prefix(STRING_PREFIX)
                .map(Reply::Str)
                .ok_or(Error::MissingField { tag: "string", field: "text" }),
            "function" => {
                let _ignored = fields.next();
                let id = decode_id(fields.next(), "function")?;
                Ok(Reply::Function { id })
            }
            "object" => {
                let class = fields
                    .next()
                    .filter(|c| !c.is_empty())
                    .ok_or(Error::MissingField { tag: "object", field: "class" })?;
                let id = decode_id(fields.next(), "object")?;
                Ok(Reply::Object { class, id })
            }
            other => Err(Error::UnknownTag(other.to_string())),
        }
    }
}

/// Renders the wire form. `decode(reply.to_string())` yields the same reply,
/// except that reals with a zero fraction come back as integers.
impl std::fmt::Display for Reply<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Null => f.write_str("null"),
            Reply::Undefined => f.write_str("undefined"),
            Reply::Bool(b) => write!(f, "boolean,{}", b),
            Reply::Int(n) => write!(f, "number,{}", n),
            Reply::Real(x) => write!(f, "number,{}", x),
            Reply::Str(s) => write!(f, "string,{}", s),
            Reply::Function { id } => write!(f, "function,,{}", id),
            Reply::Object { class, id } => write!(f, "object,{},{}", class, id),
        }
    }
}

/// Parses a real and narrows it to an integer when the fraction is exactly zero.
fn decode_number(literal: &str) -> Result<Reply<'static>> {
    let value: f64 = literal
        .trim()
        .parse()
        .map_err(|_| Error::MalformedNumber(literal.to_string()))?;

    // 2^63 is the first magnitude an i64 cannot hold.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < LIMIT {
        Ok(Reply::Int(value as i64))
    } else {
        Ok(Reply::Real(value))
    }
}

fn decode_id(field: Option<&str>, tag: &'static str) -> Result<ObjectId> {
    field
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ObjectId::new)
        .ok_or(Error::MissingField { tag, field: "id" })
}
