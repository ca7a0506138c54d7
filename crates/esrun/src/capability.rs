//! # Capabilities
//!
//! The host's class hierarchy is deep. The bridge flattens it into a few
//! capability traits, each a thin layer of named accessors over the dynamic
//! [`Remote`] surface. A typed proxy kind implements the traits whose members
//! its host classes carry; anything else stays reachable through `get`/`call`.

use crate::collection::Iter;
use crate::error::Result;
use crate::proxy::Proxy;
use crate::value::Value;

/// Dynamic member access on a remote object.
pub trait Remote {
    fn proxy(&self) -> &Proxy;

    fn get(&self, name: &str) -> Result<Value> {
        self.proxy().get(name)
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        self.proxy().set(name, value)
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.proxy().call(method, args)
    }

    /// Host-side equality.
    fn equals(&self, other: &dyn Remote) -> Result<bool> {
        self.proxy().equals(other.proxy())
    }

    fn reference(&self) -> String {
        self.proxy().reference()
    }
}

impl Remote for Proxy {
    fn proxy(&self) -> &Proxy {
        self
    }
}

/// Objects with a position on the timeline.
pub trait TimeBounds: Remote {
    /// Current time, in seconds.
    fn time(&self) -> Result<f64> {
        self.get("time")?.as_f64()
    }

    fn duration(&self) -> Result<f64> {
        self.get("duration")?.as_f64()
    }
}

/// Objects holding child properties, addressed by index or by name.
pub trait PropertyContainer: Remote {
    fn property(&self, key: impl Into<Value>) -> Result<Value>
    where
        Self: Sized,
    {
        self.call("property", &[key.into()])
    }

    fn num_properties(&self) -> Result<usize> {
        self.get("numProperties")?.as_len()
    }
}

/// Objects answering `length` and `[i]`.
pub trait Indexable: Remote {
    fn len(&self) -> Result<usize> {
        self.get("length")?.as_len()
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn index(&self, index: usize) -> Result<Value> {
        self.proxy().index(index)
    }

    /// A fresh pass over `0..len`.
    fn iter(&self) -> Iter {
        Iter::new(self.proxy().clone())
    }
}
