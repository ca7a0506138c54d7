//! # Class Dispatch Table
//!
//! Maps a host type tag to the constructor for its client-side kind. Consulted
//! once per object reply; fixed once a session is built.
//!
//! ## Invariants
//!
//! - **Total**: every tag resolves. Unregistered tags land on [`Object::Generic`].
//! - **Arrays are values**: tags registered with [`ClassTable::register_array`]
//!   do not produce an object at all. The session materializes them into a
//!   [`Value::List`](crate::Value::List) at decode time.

use std::collections::HashMap;

use crate::app::Application;
use crate::collection::Collection;
use crate::object::AvItem;
use crate::object::Item;
use crate::object::Layer;
use crate::object::Object;
use crate::object::Property;
use crate::proxy::Proxy;

pub type Constructor = fn(Proxy) -> Object;

/// What a type tag decodes to.
#[derive(Clone, Copy)]
pub enum Construct {
    /// Materialize into a list of elements.
    Array,
    Object(Constructor),
}

const ITEMS: &[&str] = &["Item", "FolderItem"];
const AV_ITEMS: &[&str] = &["AVItem", "CompItem", "FootageItem"];
const LAYERS: &[&str] = &[
    "Layer",
    "AVLayer",
    "CameraLayer",
    "LightLayer",
    "ShapeLayer",
    "TextLayer",
    "ThreeDModelLayer",
];
const PROPERTIES: &[&str] = &[
    "PropertyBase",
    "Property",
    "PropertyGroup",
    "MaskPropertyGroup",
    "Mask",
    "Effect",
    "LayerStyle",
];
const COLLECTIONS: &[&str] = &[
    "Collection",
    "ItemCollection",
    "LayerCollection",
    "OMCollection",
    "RQItemCollection",
    "EffectCollection",
    "LayerStyles",
];
const PLAIN: &[&str] = &[
    "Project",
    "Settings",
    "FootageSource",
    "FileSource",
    "SolidSource",
    "PlaceholderSource",
    "MaskFeather",
    "TextDocument",
    "Shape",
    "RenderQueue",
    "RenderQueueItem",
    "OutputModule",
    "System",
    "Viewer",
    "ViewOptions",
    "KeyframeEase",
    "MarkerValue",
    "ImportOptions",
];

/// Registry of type tag to constructor.
#[derive(Clone)]
pub struct ClassTable {
    classes: HashMap<String, Construct>,
}

impl ClassTable {
    /// A table with nothing registered: every object decodes as generic.
    pub fn empty() -> Self {
        Self { classes: HashMap::new() }
    }

    pub fn register(&mut self, tag: impl Into<String>, constructor: Constructor) -> &mut Self {
        self.classes.insert(tag.into(), Construct::Object(constructor));
        self
    }

    pub fn register_array(&mut self, tag: impl Into<String>) -> &mut Self {
        self.classes.insert(tag.into(), Construct::Array);
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.classes.contains_key(tag)
    }

    pub fn resolve(&self, tag: &str) -> Construct {
        self.classes
            .get(tag)
            .copied()
            .unwrap_or(Construct::Object(Object::Generic))
    }

    fn register_all(&mut self, tags: &[&str], constructor: Constructor) {
        for tag in tags {
            self.register(*tag, constructor);
        }
    }
}

/// The host application's object model.
impl Default for ClassTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register_array("Array");
        table.register("Application", |proxy| Object::Application(Application::new(proxy)));
        table.register_all(ITEMS, |proxy| Object::Item(Item::new(proxy)));
        table.register_all(AV_ITEMS, |proxy| Object::AvItem(AvItem::new(proxy)));
        table.register_all(LAYERS, |proxy| Object::Layer(Layer::new(proxy)));
        table.register_all(PROPERTIES, |proxy| Object::Property(Property::new(proxy)));
        table.register_all(COLLECTIONS, |proxy| Object::Collection(Collection::new(proxy)));
        table.register_all(PLAIN, Object::Plain);
        table
    }
}

impl std::fmt::Debug for ClassTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.classes.keys().collect();
        tags.sort();
        f.debug_struct("ClassTable").field("tags", &tags).finish()
    }
}
