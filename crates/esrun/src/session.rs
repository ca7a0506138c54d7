//! # Session
//!
//! One connection to one host. The session owns the transport, the dialect and
//! the class table, and keeps the lease counts that decide when a remote
//! object is deleted.
//!
//! ## Philosophy
//!
//! - **Single-threaded**: a session and its proxies are `!Send`. One request is
//!   in flight at a time and every call blocks until the host answers.
//! - **Handles, not objects**: the host owns every object. The session only
//!   counts how many client handles still point at each id.
//!
//! ## Invariants
//!
//! - At most one `deleteObject` is sent per acquisition of an id: when its
//!   last lease is released.
//! - No `RefCell` borrow is held across a transport call, so decoding may
//!   re-enter the session (array materialization does).

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use esrpc::Dialect;
use esrpc::Message;
use esrpc::ObjectId;
use esrpc::Reply;
use esrpc::literal;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::app::Application;
use crate::builder::SessionBuilder;
use crate::classes::ClassTable;
use crate::classes::Construct;
use crate::error::Error;
use crate::error::Result;
use crate::error::check_name;
use crate::function::Function;
use crate::object::Object;
use crate::proxy::Proxy;
use crate::transport;
use crate::transport::Transport;
use crate::value::Value;

/// A handle to a bridge session. Clones share the session.
#[derive(Clone)]
pub struct Session {
    inner: Rc<Inner>,
}

struct Inner {
    transport: Box<dyn Transport>,
    dialect: Dialect,
    classes: ClassTable,
    /// Live leases per id.
    leases: RefCell<HashMap<ObjectId, usize>>,
}

impl Session {
    pub fn builder(transport: impl Transport + 'static) -> SessionBuilder {
        SessionBuilder::new(transport)
    }

    /// A session with the default dialect and class table.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::builder(transport).build()
    }

    pub(crate) fn from_parts(
        transport: Box<dyn Transport>,
        dialect: Dialect,
        classes: ClassTable,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                dialect,
                classes,
                leases: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.inner.dialect
    }

    pub fn classes(&self) -> &ClassTable {
        &self.inner.classes
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    /// Number of ids this session still holds leases on.
    pub fn live_handles(&self) -> usize {
        self.inner.leases.borrow().len()
    }

    /// Executes one expression and returns the raw reply.
    pub fn execute(&self, code: &str) -> Result<String> {
        debug!(code, "execute");
        let reply = self.transport().execute(&self.inner.dialect.wrap(code))?;
        trace!(reply = %reply, "reply");
        Ok(reply)
    }

    /// Executes one expression and decodes its reply.
    pub fn eval(&self, code: &str) -> Result<Value> {
        let raw = self.execute(code)?;
        self.decode(&raw)
    }

    /// Decodes a raw reply, acquiring leases for any references in it.
    pub fn decode(&self, raw: &str) -> Result<Value> {
        self.decode_reply(Reply::decode(raw)?)
    }

    /// Reads a global such as `app` or `system`.
    pub fn global(&self, name: &str) -> Result<Value> {
        check_name(name)?;
        let no_such_global = |reason: String| Error::NoSuchGlobal { name: name.to_string(), reason };

        let raw = match self.send(&Message::Global { name }) {
            Ok(raw) => raw,
            Err(Error::Transport(transport::Error::Host(reason))) => {
                return Err(no_such_global(reason));
            }
            Err(e) => return Err(e),
        };
        match Reply::decode(&raw)? {
            Reply::Undefined => Err(no_such_global("undefined".into())),
            reply => self.decode_reply(reply),
        }
    }

    /// The host application.
    pub fn app(&self) -> Result<Application> {
        self.global("app")?.into_object()?.into_application()
    }

    /// Evaluates `new <class>(<args>)`.
    pub fn construct(&self, class: &str, args: &[Value]) -> Result<Object> {
        check_name(class)?;
        let args = self.encode_args(args)?;
        self.request(&Message::Construct { class, args: &args })?.into_object()
    }

    pub(crate) fn send(&self, message: &Message<'_>) -> Result<String> {
        self.execute(&message.render(&self.inner.dialect))
    }

    pub(crate) fn request(&self, message: &Message<'_>) -> Result<Value> {
        let raw = self.send(message)?;
        self.decode(&raw)
    }

    pub(crate) fn decode_reply(&self, reply: Reply<'_>) -> Result<Value> {
        let value = match reply {
            Reply::Null | Reply::Undefined => Value::Null,
            Reply::Bool(b) => Value::Bool(b),
            Reply::Int(n) => Value::Int(n),
            Reply::Real(x) => Value::Real(x),
            Reply::Str(s) => Value::Str(s.to_string()),
            Reply::Function { id } => Value::Function(Function::new(Proxy::acquire(self, id, None))),
            Reply::Object { class, id } => {
                let proxy = Proxy::acquire(self, id, Some(class));
                match self.inner.classes.resolve(class) {
                    Construct::Array => self.materialize(proxy)?,
                    Construct::Object(constructor) => Value::Object(constructor(proxy)),
                }
            }
        };
        Ok(value)
    }

    /// Copies a host array element by element. The array handle itself is
    /// released on return.
    fn materialize(&self, array: Proxy) -> Result<Value> {
        let len = array.get("length")?.as_len()?;
        let items = (0..len)
            .map(|i| array.index(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::List(items))
    }

    pub(crate) fn encode(&self, value: &Value) -> Result<String> {
        Ok(literal::encode(&value.to_literal()?, &self.inner.dialect)?)
    }

    pub(crate) fn encode_args(&self, args: &[Value]) -> Result<String> {
        let literals = args.iter().map(Value::to_literal).collect::<Result<Vec<_>>>()?;
        Ok(literal::encode_args(&literals, &self.inner.dialect)?)
    }

    pub(crate) fn lease(&self, id: &ObjectId) {
        let mut leases = self.inner.leases.borrow_mut();
        let count = leases.entry(id.clone()).or_insert(0);
        *count += 1;
        debug!(%id, leases = *count, "handle acquired");
    }

    /// Drops one lease on `id`, deleting the host entry with the last one.
    /// Failures are logged, never raised.
    pub(crate) fn release(&self, id: &ObjectId) {
        let remaining = {
            let mut leases = self.inner.leases.borrow_mut();
            match leases.get_mut(id) {
                Some(count) if *count > 1 => {
                    *count -= 1;
                    *count
                }
                Some(_) => {
                    leases.remove(id);
                    0
                }
                None => return,
            }
        };
        debug!(%id, leases = remaining, "handle released");

        if remaining == 0 {
            if let Err(e) = self.send(&Message::Delete { id }) {
                warn!(%id, error = %e, "failed to delete remote object");
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("dialect", &self.inner.dialect)
            .field("classes", &self.inner.classes)
            .field("live_handles", &self.live_handles())
            .finish()
    }
}
