//! # Callables
//!
//! Two ways to call into the host:
//!
//! - [`Function`]: a function value living in the object table, invoked
//!   through the `callFn` helper with no receiver.
//! - [`Method`]: a member read off a receiver, invoked as `<ref>.<name>(...)`
//!   so the host binds `this`.

use std::fmt;

use esrpc::Message;

use crate::error::Result;
use crate::proxy::Proxy;
use crate::value::Value;

/// A remote function value.
#[derive(Clone, Debug)]
pub struct Function {
    proxy: Proxy,
}

impl Function {
    pub(crate) fn new(proxy: Proxy) -> Self {
        Self { proxy }
    }

    pub fn proxy(&self) -> &Proxy {
        &self.proxy
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        let id = self.proxy.live_id()?;
        let session = self.proxy.session();
        let args = session.encode_args(args)?;
        session.request(&Message::CallFunction { id, args: &args })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function(id:{})", self.proxy.id())
    }
}

/// A member function bound to the receiver it was read from.
#[derive(Clone, Debug)]
pub struct Method {
    receiver: Proxy,
    name: String,
}

impl Method {
    pub(crate) fn new(receiver: Proxy, name: &str) -> Self {
        Self { receiver, name: name.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn receiver(&self) -> &Proxy {
        &self.receiver
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.receiver.call(&self.name, args)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.receiver, self.name)
    }
}
