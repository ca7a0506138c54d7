//! # Values
//!
//! What crosses the bridge from the client's point of view: decoded replies on
//! the way in, call arguments on the way out.

use esrpc::Literal;

use crate::error::Error;
use crate::error::Result;
use crate::function::Function;
use crate::function::Method;
use crate::object::Object;
use crate::proxy::Proxy;

/// A client-side value.
///
/// `Null` through `Str`, `Object` and `Function` come back from the host.
/// `List` comes back only as a materialized host array. `Map` and `Expr` are
/// argument-only.
///
/// No `PartialEq`: the host decides remote identity. See [`Value::remote_eq`].
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Value>),
    /// Object literal; key order is preserved.
    Map(Vec<(String, Value)>),
    Object(Object),
    Function(Function),
    Method(Method),
    /// A raw host expression, spliced into generated code unescaped.
    Expr(String),
}

impl Value {
    /// The host's `undefined`, for optional constructor and method arguments.
    pub fn undefined() -> Self {
        Value::Expr("undefined".into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Method(_) => "method",
            Value::Expr(_) => "expression",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Integers widen; reals pass through.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Int(n) => Ok(*n as f64),
            Value::Real(x) => Ok(*x),
            other => Err(other.mismatch("number")),
        }
    }

    /// A host-reported length or count.
    pub fn as_len(&self) -> Result<usize> {
        match self {
            Value::Int(n) => usize::try_from(*n).map_err(|_| self.mismatch("length")),
            other => Err(other.mismatch("length")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_list(&self) -> Result<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other.mismatch("list")),
        }
    }

    pub fn into_list(self) -> Result<Vec<Value>> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other.mismatch("list")),
        }
    }

    pub fn into_object(self) -> Result<Object> {
        match self {
            Value::Object(object) => Ok(object),
            other => Err(other.mismatch("object")),
        }
    }

    pub fn into_function(self) -> Result<Function> {
        match self {
            Value::Function(function) => Ok(function),
            other => Err(other.mismatch("function")),
        }
    }

    pub fn into_method(self) -> Result<Method> {
        match self {
            Value::Method(method) => Ok(method),
            other => Err(other.mismatch("method")),
        }
    }

    /// The remote handle behind this value, if it has one.
    pub fn as_proxy(&self) -> Option<&Proxy> {
        match self {
            Value::Object(object) => Some(object.proxy()),
            Value::Function(function) => Some(function.proxy()),
            _ => None,
        }
    }

    /// Host-side equality. False unless both values are remote handles, in
    /// which case the host decides.
    pub fn remote_eq(&self, other: &Value) -> Result<bool> {
        match (self.as_proxy(), other.as_proxy()) {
            (Some(lhs), Some(rhs)) => lhs.equals(rhs),
            _ => Ok(false),
        }
    }

    pub(crate) fn to_literal(&self) -> Result<Literal> {
        let literal = match self {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Int(n) => Literal::Int(*n),
            Value::Real(x) => Literal::Real(*x),
            Value::Str(s) => Literal::Str(s.clone()),
            Value::List(items) => Literal::List(
                items.iter().map(Value::to_literal).collect::<Result<Vec<_>>>()?,
            ),
            Value::Map(entries) => Literal::Map(
                entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.to_literal()?)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(object) => Literal::Ref(object.proxy().live_id()?.clone()),
            Value::Function(function) => Literal::Ref(function.proxy().live_id()?.clone()),
            Value::Method(_) => {
                return Err(esrpc::Error::Unencodable("a bound method".into()).into());
            }
            Value::Expr(expr) => Literal::Expr(expr.clone()),
        };
        Ok(literal)
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch { expected, found: self.type_name() }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        match i64::try_from(n) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Real(n as f64),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<&Proxy> for Value {
    fn from(proxy: &Proxy) -> Self {
        Value::Object(Object::Generic(proxy.clone()))
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

/// Plain data, e.g. settings read from a JSON document.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
