//! # Collections
//!
//! Host collections answer `length` and `[i]`. Iteration walks `0..length`
//! with one round trip per element.
//!
//! ## Invariants
//!
//! - **Independent passes**: each [`Iter`] owns its cursor, so two passes over
//!   one collection may overlap without disturbing each other.
//! - **Length once per pass**: read lazily on the first `next()`, never again.
//! - **Fused on error**: a failed round trip is yielded once, then the pass
//!   ends.

use crate::capability::Indexable;
use crate::error::Result;
use crate::object::remote_kind;
use crate::proxy::Proxy;
use crate::value::Value;

remote_kind! {
    /// A host collection: project items, layers, render queue items, effects.
    Collection
}

impl Indexable for Collection {}

impl Collection {
    /// Reads every element in one pass.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = Result<Value>;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

/// A forward-only pass over an indexable remote object.
pub struct Iter {
    proxy: Proxy,
    position: usize,
    len: Option<usize>,
    done: bool,
}

impl Iter {
    pub(crate) fn new(proxy: Proxy) -> Self {
        Self { proxy, position: 0, len: None, done: false }
    }

    fn len(&mut self) -> Result<usize> {
        match self.len {
            Some(len) => Ok(len),
            None => {
                let len = self.proxy.get("length")?.as_len()?;
                self.len = Some(len);
                Ok(len)
            }
        }
    }
}

impl Iterator for Iter {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Result<Value>> {
        if self.done {
            return None;
        }

        let len = match self.len() {
            Ok(len) => len,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if self.position >= len {
            self.done = true;
            return None;
        }

        let item = self.proxy.index(self.position);
        self.position += 1;
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (self.done, self.len) {
            (true, _) => (0, Some(0)),
            (false, Some(len)) => {
                // A failed round trip can end the pass early.
                (0, Some(len.saturating_sub(self.position)))
            }
            (false, None) => (0, None),
        }
    }
}

impl std::iter::FusedIterator for Iter {}
