//! # Literals
//!
//! Encodes a client value tree as one host expression.
//!
//! ## Algorithm
//!
//! A generic structured-literal encoder (JSON) has no way to say "evaluate
//! this, don't quote it". So encoding takes two passes:
//!
//! 1. Encode the tree as JSON, writing every remote reference (and every other
//!    raw expression) as a unique placeholder string.
//! 2. Scan the JSON text once, left to right, replacing each quoted
//!    placeholder with its raw fragment. Spliced fragments are never rescanned.
//!
//! ## Invariants
//! - **Unforgeable placeholders**: the placeholder marker is chosen so that no
//!   string or key in the tree contains it; user text is never spliced.
//! - **Ordered maps**: keys are emitted in insertion order.

use serde_json::Number;
use serde_json::Value as Json;

use crate::Dialect;
use crate::ObjectId;
use crate::error::Error;
use crate::error::Result;

/// The maximum nesting depth for literals before refusing to encode.
const MAX_RECURSION_DEPTH: usize = 64;

/// A client-side value, ready to be written into a host expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Literal>),
    /// Object literal; key order is preserved.
    Map(Vec<(String, Literal)>),
    /// A remote object, written as its reference form.
    Ref(ObjectId),
    /// A raw host expression, written verbatim.
    Expr(String),
}

/// Encodes a single value.
pub fn encode(literal: &Literal, dialect: &Dialect) -> Result<String> {
    let mut splicer = Splicer::new(std::slice::from_ref(literal));
    let json = splicer.lower(literal, dialect, 0)?;
    Ok(splicer.splice(&json.to_string()))
}

/// Encodes an argument list as comma-separated expressions, without brackets.
pub fn encode_args(args: &[Literal], dialect: &Dialect) -> Result<String> {
    let mut splicer = Splicer::new(args);
    let items = args
        .iter()
        .map(|arg| splicer.lower(arg, dialect, 1))
        .collect::<Result<Vec<_>>>()?;

    let text = Json::Array(items).to_string();
    // "[...]" -> "..."
    let inner = &text[1..text.len() - 1];
    Ok(splicer.splice(inner))
}

/// Issues placeholders for raw fragments and splices them back in.
struct Splicer {
    marker: String,
    fragments: Vec<String>,
}

impl Splicer {
    fn new(roots: &[Literal]) -> Self {
        let mut marker = String::from('\u{1}');
        while roots.iter().any(|root| mentions(root, &marker, 0)) {
            marker.push('\u{1}');
        }
        Self { marker, fragments: Vec::new() }
    }

    fn placeholder(&self, index: usize) -> String {
        format!("{m}{index}{m}", m = self.marker)
    }

    fn issue(&mut self, fragment: String) -> Json {
        let placeholder = self.placeholder(self.fragments.len());
        self.fragments.push(fragment);
        Json::String(placeholder)
    }

    /// Pass 1: lower the tree to JSON with placeholders.
    fn lower(&mut self, literal: &Literal, dialect: &Dialect, depth: usize) -> Result<Json> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::Unencodable("a literal nested this deeply".into()));
        }

        let json = match literal {
            Literal::Null => Json::Null,
            Literal::Bool(b) => Json::Bool(*b),
            Literal::Int(n) => Json::Number(Number::from(*n)),
            Literal::Real(x) => match Number::from_f64(*x) {
                Some(n) => Json::Number(n),
                // JSON has no spelling for these; the host does.
                None if x.is_nan() => self.issue("NaN".into()),
                None if *x > 0.0 => self.issue("Infinity".into()),
                None => self.issue("-Infinity".into()),
            },
            Literal::Str(s) => Json::String(s.clone()),
            Literal::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.lower(item, dialect, depth + 1))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Literal::Map(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (key, value) in entries {
                    let value = self.lower(value, dialect, depth + 1)?;
                    map.insert(key.clone(), value);
                }
                Json::Object(map)
            }
            Literal::Ref(id) => self.issue(dialect.reference(id)),
            Literal::Expr(expr) => self.issue(expr.clone()),
        };
        Ok(json)
    }

    /// Pass 2: replace each quoted placeholder with its fragment, in one pass.
    fn splice(&self, text: &str) -> String {
        // The marker as it appears inside JSON text.
        let quoted = Json::String(self.marker.clone()).to_string();
        let escaped = &quoted[1..quoted.len() - 1];
        let open = format!("\"{escaped}");
        let close = format!("{escaped}\"");

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(&open) {
            out.push_str(&rest[..start]);
            let after = &rest[start + open.len()..];
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            let fragment = after[..digits]
                .parse::<usize>()
                .ok()
                .filter(|_| after[digits..].starts_with(&close))
                .and_then(|index| self.fragments.get(index));

            match fragment {
                Some(fragment) => {
                    out.push_str(fragment);
                    rest = &after[digits + close.len()..];
                }
                None => {
                    out.push_str(&open);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Returns true if any string or key in the tree contains `needle`.
///
/// Raw text needs no check: it is never part of the scanned JSON. A string
/// holding the escaped spelling of the marker is escaped again on output.
fn mentions(literal: &Literal, needle: &str, depth: usize) -> bool {
    if depth > MAX_RECURSION_DEPTH {
        return false;
    }
    match literal {
        Literal::Str(s) => s.contains(needle),
        Literal::List(items) => items.iter().any(|item| mentions(item, needle, depth + 1)),
        Literal::Map(entries) => entries
            .iter()
            .any(|(key, value)| key.contains(needle) || mentions(value, needle, depth + 1)),
        _ => false,
    }
}
