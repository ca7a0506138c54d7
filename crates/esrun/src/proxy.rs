//! # Remote Object Proxy
//!
//! A `Proxy` is a local, non-owning handle to one entry in the host's object
//! table. Attribute reads, writes and method calls are forwarded to the host
//! and their replies decoded.
//!
//! ## Lifetime
//!
//! A proxy holds a lease on its id. Clones share the lease. The lease is
//! released exactly once: on [`Proxy::dispose`], or when the last clone is
//! dropped. After that every operation fails with [`Error::Disposed`] without
//! contacting the host. Whether a delete message is sent on release is the
//! session's decision; see [`Session::live_handles`].
//!
//! Private slots hold strong values. A proxy stored in its own slots, directly
//! or through another proxy, keeps the lease alive until [`Proxy::dispose`] is
//! called on one of them.
//!
//! ## Invariants
//!
//! - Equality is never decided locally. Two proxies with the same id may still
//!   have to be compared by the host, and two different ids may denote equal
//!   host objects.

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use esrpc::Message;
use esrpc::ObjectId;
use esrpc::Reply;

use crate::error::Error;
use crate::error::Result;
use crate::error::check_name;
use crate::function::Method;
use crate::session::Session;
use crate::value::Value;

/// A handle to one remote object.
#[derive(Clone)]
pub struct Proxy {
    lease: Rc<Lease>,
}

struct Lease {
    session: Session,
    id: ObjectId,
    class: Option<String>,
    released: Cell<bool>,
    /// Attributes that live on the proxy, never on the host.
    locals: RefCell<HashMap<String, Value>>,
}

impl Lease {
    fn release(&self) {
        if self.released.replace(true) {
            return;
        }
        let locals = std::mem::take(&mut *self.locals.borrow_mut());
        drop(locals);
        self.session.release(&self.id);
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.release();
    }
}

impl Proxy {
    /// Takes a lease on `id`. The host must already hold the entry.
    pub(crate) fn acquire(session: &Session, id: ObjectId, class: Option<&str>) -> Self {
        session.lease(&id);
        Self {
            lease: Rc::new(Lease {
                session: session.clone(),
                id,
                class: class.map(str::to_string),
                released: Cell::new(false),
                locals: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.lease.id
    }

    /// The host's type tag, if the reply carried one.
    pub fn class_name(&self) -> Option<&str> {
        self.lease.class.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.lease.session
    }

    /// The expression that resolves to this object inside the host.
    pub fn reference(&self) -> String {
        self.session().dialect().reference(self.id())
    }

    pub fn is_disposed(&self) -> bool {
        self.lease.released.get()
    }

    /// Releases the lease now. Idempotent.
    pub fn dispose(&self) {
        self.lease.release();
    }

    pub(crate) fn live_id(&self) -> Result<&ObjectId> {
        if self.is_disposed() {
            return Err(Error::Disposed(self.id().clone()));
        }
        Ok(self.id())
    }

    /// Reads an attribute.
    ///
    /// A function-valued attribute comes back as a [`Method`] bound to this
    /// receiver, so calling it later supplies `this`. A private name with no
    /// local slot is read from the host.
    pub fn get(&self, name: &str) -> Result<Value> {
        let id = self.live_id()?;

        if let Some(value) = self.lease.locals.borrow().get(name) {
            return Ok(value.clone());
        }
        check_name(name)?;

        let raw = self.session().send(&Message::GetAttr { id, name })?;
        let value = match Reply::decode(&raw)? {
            Reply::Undefined => return Err(self.no_such_member(name)),
            reply => self.session().decode_reply(reply)?,
        };

        match value {
            Value::Function(function) => {
                // The bare function entry is not needed once rebound.
                function.proxy().dispose();
                Ok(Value::Method(Method::new(self.clone(), name)))
            }
            value => Ok(value),
        }
    }

    /// Writes an attribute.
    ///
    /// Private names, and names already held locally, stay on the proxy.
    /// Everything else is assigned on the host; the name travels quoted, so
    /// any text is accepted.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let id = self.live_id()?;
        let value = value.into();

        let local = self.session().dialect().is_private(name)
            || self.lease.locals.borrow().contains_key(name);
        if local {
            let previous = self.lease.locals.borrow_mut().insert(name.to_string(), value);
            drop(previous);
            return Ok(());
        }

        let encoded = self.session().encode(&value)?;
        self.session().send(&Message::SetAttr { id, name, value: &encoded })?;
        Ok(())
    }

    /// Calls a method on the remote object.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let id = self.live_id()?;
        check_name(method)?;

        let args = self.session().encode_args(args)?;
        self.session().request(&Message::CallMethod { id, name: method, args: &args })
    }

    /// Reads `<ref>[index]`.
    pub fn index(&self, index: usize) -> Result<Value> {
        let id = self.live_id()?;
        self.session().request(&Message::Index { id, index })
    }

    /// Asks the host whether both proxies denote equal objects.
    pub fn equals(&self, other: &Proxy) -> Result<bool> {
        let lhs = self.live_id()?;
        let rhs = other.live_id()?;
        match self.session().request(&Message::Equals { lhs, rhs })? {
            Value::Bool(equal) => Ok(equal),
            other => Err(Error::TypeMismatch { expected: "boolean", found: other.type_name() }),
        }
    }

    fn no_such_member(&self, name: &str) -> Error {
        Error::NoSuchMember {
            class: self.class_name().unwrap_or("object").to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(id:{})", self.class_name().unwrap_or("object"), self.id())
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("id", self.id())
            .field("class", &self.class_name())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
