//! # Typed Objects
//!
//! Decoding an object reply dispatches on its type tag through the
//! [`ClassTable`](crate::ClassTable) and lands on one of these kinds. Kinds add
//! named accessors; the dynamic surface of [`Remote`] is always there
//! underneath, so an unregistered tag loses nothing but the accessors.

use std::fmt;

use crate::app::Application;
use crate::capability::PropertyContainer;
use crate::capability::Remote;
use crate::capability::TimeBounds;
use crate::collection::Collection;
use crate::error::Error;
use crate::error::Result;
use crate::proxy::Proxy;
use crate::value::Value;

/// Declares a typed kind: a newtype over [`Proxy`] implementing [`Remote`].
macro_rules! remote_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            proxy: $crate::proxy::Proxy,
        }

        impl $name {
            pub fn new(proxy: $crate::proxy::Proxy) -> Self {
                Self { proxy }
            }
        }

        impl $crate::capability::Remote for $name {
            fn proxy(&self) -> &$crate::proxy::Proxy {
                &self.proxy
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.proxy, f)
            }
        }
    };
}

pub(crate) use remote_kind;

remote_kind! {
    /// A project panel entry: folders, compositions, footage.
    Item
}

remote_kind! {
    /// An item with a time dimension: compositions and footage.
    AvItem
}

remote_kind! {
    /// A layer in a composition.
    Layer
}

remote_kind! {
    /// A property, property group, mask, effect or layer style.
    Property
}

impl AvItem {
    /// The composition's layers. Fails with a type mismatch on footage.
    pub fn layers(&self) -> Result<Collection> {
        self.get("layers")?.into_object()?.into_collection()
    }
}

impl TimeBounds for AvItem {}

impl Layer {
    pub fn in_point(&self) -> Result<f64> {
        self.get("inPoint")?.as_f64()
    }

    pub fn out_point(&self) -> Result<f64> {
        self.get("outPoint")?.as_f64()
    }
}

impl TimeBounds for Layer {
    /// The span the layer is visible for, `outPoint - inPoint`.
    fn duration(&self) -> Result<f64> {
        Ok(self.out_point()? - self.in_point()?)
    }
}

impl PropertyContainer for Layer {}

impl Property {
    pub fn value(&self) -> Result<Value> {
        self.get("value")
    }

    pub fn set_value(&self, value: impl Into<Value>) -> Result<()> {
        self.call("setValue", &[value.into()])?;
        Ok(())
    }
}

impl PropertyContainer for Property {}

/// A decoded remote object.
#[derive(Clone, Debug)]
pub enum Object {
    /// Unregistered type tag.
    Generic(Proxy),
    /// Registered, with no accessors beyond the dynamic surface.
    Plain(Proxy),
    Application(Application),
    Item(Item),
    AvItem(AvItem),
    Layer(Layer),
    Property(Property),
    Collection(Collection),
}

impl Object {
    pub fn proxy(&self) -> &Proxy {
        match self {
            Object::Generic(proxy) | Object::Plain(proxy) => proxy,
            Object::Application(app) => app.proxy(),
            Object::Item(item) => item.proxy(),
            Object::AvItem(item) => item.proxy(),
            Object::Layer(layer) => layer.proxy(),
            Object::Property(property) => property.proxy(),
            Object::Collection(collection) => collection.proxy(),
        }
    }

    /// The host's type tag.
    pub fn class_name(&self) -> Option<&str> {
        self.proxy().class_name()
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Object::Generic(_))
    }

    pub fn into_application(self) -> Result<Application> {
        match self {
            Object::Application(app) => Ok(app),
            other => Err(other.mismatch("application")),
        }
    }

    pub fn into_item(self) -> Result<Item> {
        match self {
            Object::Item(item) => Ok(item),
            other => Err(other.mismatch("item")),
        }
    }

    pub fn into_av_item(self) -> Result<AvItem> {
        match self {
            Object::AvItem(item) => Ok(item),
            other => Err(other.mismatch("AV item")),
        }
    }

    pub fn into_layer(self) -> Result<Layer> {
        match self {
            Object::Layer(layer) => Ok(layer),
            other => Err(other.mismatch("layer")),
        }
    }

    pub fn into_property(self) -> Result<Property> {
        match self {
            Object::Property(property) => Ok(property),
            other => Err(other.mismatch("property")),
        }
    }

    pub fn into_collection(self) -> Result<Collection> {
        match self {
            Object::Collection(collection) => Ok(collection),
            other => Err(other.mismatch("collection")),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Object::Generic(_) => "generic object",
            Object::Plain(_) => "object",
            Object::Application(_) => "application",
            Object::Item(_) => "item",
            Object::AvItem(_) => "AV item",
            Object::Layer(_) => "layer",
            Object::Property(_) => "property",
            Object::Collection(_) => "collection",
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch { expected, found: self.kind() }
    }
}

impl Remote for Object {
    fn proxy(&self) -> &Proxy {
        Object::proxy(self)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.proxy(), f)
    }
}
