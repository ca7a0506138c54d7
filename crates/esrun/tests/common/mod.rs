//! An in-memory host for integration tests.
//!
//! `FakeHost` interprets the outbound message shapes against a small object
//! graph and keeps a real object table: every object reply issues a fresh
//! table id, `deleteObject` frees it, and unknown ids raise like the host would.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use esrun::transport;
use esrun::transport::Transport;
use serde_json::Value as Json;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug)]
enum HostValue {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Obj(usize),
}

#[derive(Default)]
struct HostObject {
    class: String,
    members: HashMap<String, HostValue>,
    methods: Vec<String>,
    /// `length` and `[i]`.
    elements: Option<Vec<HostValue>>,
    /// Children reachable through `property(key)`.
    properties: Vec<usize>,
    /// Set on function objects.
    function: Option<String>,
}

#[derive(Default)]
struct State {
    arena: Vec<HostObject>,
    globals: HashMap<String, HostValue>,
    /// Table id to arena index.
    table: HashMap<u64, usize>,
    next_id: u64,
    undo_log: Vec<String>,
    executed: usize,
}

fn raised(message: impl Into<String>) -> transport::Error {
    transport::Error::Host(message.into())
}

type HostResult<T> = Result<T, transport::Error>;

impl State {
    fn alloc(&mut self, class: &str) -> usize {
        self.arena.push(HostObject { class: class.to_string(), ..Default::default() });
        self.arena.len() - 1
    }

    fn set(&mut self, obj: usize, name: &str, value: HostValue) {
        self.arena[obj].members.insert(name.to_string(), value);
    }

    fn lookup(&self, id: u64) -> HostResult<usize> {
        self.table
            .get(&id)
            .copied()
            .ok_or_else(|| raised(format!("table[{}] is undefined", id)))
    }

    fn reply(&mut self, value: HostValue) -> String {
        match value {
            HostValue::Null => "null".into(),
            HostValue::Bool(b) => format!("boolean,{}", b),
            HostValue::Num(x) => format!("number,{}", x),
            HostValue::Str(s) => format!("string,{}", s),
            HostValue::Obj(obj) => {
                self.next_id += 1;
                let id = self.next_id;
                self.table.insert(id, obj);
                match &self.arena[obj].function {
                    Some(_) => format!("function,,{}", id),
                    None => format!("object,{},{}", self.arena[obj].class, id),
                }
            }
        }
    }

    fn from_json(&mut self, json: Json) -> HostResult<HostValue> {
        Ok(match json {
            Json::Null => HostValue::Null,
            Json::Bool(b) => HostValue::Bool(b),
            Json::Number(n) => HostValue::Num(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => HostValue::Str(s),
            Json::Object(map) if map.contains_key("$ref") => {
                let id = map["$ref"].as_u64().ok_or_else(|| raised("bad reference"))?;
                HostValue::Obj(self.lookup(id)?)
            }
            other => {
                let obj = self.alloc("Object");
                self.set(obj, "json", HostValue::Str(other.to_string()));
                HostValue::Obj(obj)
            }
        })
    }

    fn args(&mut self, text: &str) -> HostResult<Vec<HostValue>> {
        let json: Vec<Json> = serde_json::from_str(&format!("[{}]", rewrite_refs(text)))
            .map_err(|e| raised(format!("SyntaxError: {}", e)))?;
        json.into_iter().map(|j| self.from_json(j)).collect()
    }

    fn get(&mut self, obj: usize, name: &str) -> String {
        let object = &self.arena[obj];
        let value = match (&object.elements, name) {
            (Some(elements), "length") => Some(HostValue::Num(elements.len() as f64)),
            _ => object.members.get(name).cloned(),
        };
        if let Some(value) = value {
            return self.reply(value);
        }
        if self.arena[obj].methods.iter().any(|m| m == name) {
            let function = self.alloc("Function");
            self.arena[function].function = Some(name.to_string());
            return self.reply(HostValue::Obj(function));
        }
        "undefined".into()
    }

    fn index(&mut self, obj: usize, index: usize) -> String {
        let item = self.arena[obj]
            .elements
            .as_ref()
            .and_then(|elements| elements.get(index).cloned());
        match item {
            Some(value) => self.reply(value),
            None => "undefined".into(),
        }
    }

    fn call_method(&mut self, obj: usize, name: &str, args: Vec<HostValue>) -> HostResult<String> {
        if !self.arena[obj].methods.iter().any(|m| m == name) {
            return Err(raised(format!("TypeError: {} is not a function", name)));
        }
        match (name, args.as_slice()) {
            ("beginUndoGroup", [HostValue::Str(group)]) => {
                self.undo_log.push(format!("begin:{}", group));
                Ok("null".into())
            }
            ("endUndoGroup", []) => {
                self.undo_log.push("end".into());
                Ok("null".into())
            }
            ("layer", [HostValue::Num(n)]) => {
                let layers = match self.arena[obj].members.get("layers") {
                    Some(HostValue::Obj(layers)) => *layers,
                    _ => return Err(raised("no layers")),
                };
                let position = (*n as usize)
                    .checked_sub(1)
                    .ok_or_else(|| raised("layer index out of range"))?;
                Ok(self.index(layers, position))
            }
            ("property", [key]) => {
                let arena = &self.arena;
                let found = arena[obj].properties.iter().copied().enumerate().find(|(i, child)| {
                    match key {
                        HostValue::Num(n) => *n as usize == i + 1,
                        HostValue::Str(s) => matches!(
                            arena[*child].members.get("name"),
                            Some(HostValue::Str(name)) if name == s
                        ),
                        _ => false,
                    }
                });
                match found {
                    Some((_, child)) => Ok(self.reply(HostValue::Obj(child))),
                    None => Ok("null".into()),
                }
            }
            ("setValue", [value]) => {
                self.set(obj, "value", value.clone());
                Ok("null".into())
            }
            ("addText", [HostValue::Str(text)]) => {
                let layer = self.alloc("TextLayer");
                self.set(layer, "name", HostValue::Str(text.clone()));
                self.set(layer, "inPoint", HostValue::Num(0.0));
                self.set(layer, "outPoint", HostValue::Num(1.0));
                if let Some(elements) = self.arena[obj].elements.as_mut() {
                    elements.push(HostValue::Obj(layer));
                }
                Ok(self.reply(HostValue::Obj(layer)))
            }
            _ => Err(raised(format!("TypeError: bad arguments to {}", name))),
        }
    }

    fn call_function(&mut self, obj: usize, args: Vec<HostValue>) -> HostResult<String> {
        let function = self.arena[obj].function.clone();
        match function.as_deref() {
            Some("sum") => {
                let mut total = 0.0;
                for arg in args {
                    match arg {
                        HostValue::Num(x) => total += x,
                        _ => return Err(raised("TypeError: sum takes numbers")),
                    }
                }
                Ok(self.reply(HostValue::Num(total)))
            }
            Some(name) => Err(raised(format!("TypeError: {} needs a receiver", name))),
            None => Err(raised("TypeError: not a function")),
        }
    }

    fn construct(&mut self, class: &str, args: Vec<HostValue>) -> HostResult<String> {
        match class {
            "KeyframeEase" => {
                let ease = self.alloc("KeyframeEase");
                let mut args = args.into_iter();
                self.set(ease, "speed", args.next().unwrap_or(HostValue::Null));
                self.set(ease, "influence", args.next().unwrap_or(HostValue::Null));
                Ok(self.reply(HostValue::Obj(ease)))
            }
            other => Err(raised(format!("ReferenceError: {} is not a constructor", other))),
        }
    }

    fn eval(&mut self, code: &str) -> HostResult<String> {
        self.executed += 1;
        let code = code.strip_suffix(';').ok_or_else(|| raised("SyntaxError: missing ;"))?;

        if let Some(rest) = code.strip_prefix("deleteObject(") {
            let id = parse_id(rest.strip_suffix(')').unwrap_or(rest))?;
            self.lookup(id)?;
            self.table.remove(&id);
            return Ok("null".into());
        }
        if let Some(rest) = code.strip_prefix("setAttr(") {
            let rest = rest.strip_suffix(')').ok_or_else(|| raised("SyntaxError"))?;
            let (id, rest) = rest.split_once(", ").ok_or_else(|| raised("SyntaxError"))?;
            let obj = self.lookup(parse_id(id)?)?;
            let mut args = self.args(rest)?.into_iter();
            let (Some(HostValue::Str(name)), Some(value)) = (args.next(), args.next()) else {
                return Err(raised("SyntaxError: setAttr"));
            };
            self.set(obj, &name, value);
            return Ok("null".into());
        }
        if let Some(rest) = code.strip_prefix("callFn(") {
            let rest = rest.strip_suffix(')').ok_or_else(|| raised("SyntaxError"))?;
            let (id, args) = rest.split_once(", ").unwrap_or((rest, ""));
            let obj = self.lookup(parse_id(id)?)?;
            let args = self.args(args)?;
            return self.call_function(obj, args);
        }
        if let Some(rest) = code.strip_prefix("new ") {
            let (class, args) = rest.split_once('(').ok_or_else(|| raised("SyntaxError"))?;
            let args = self.args(args.strip_suffix(')').unwrap_or(args))?;
            return self.construct(class, args);
        }
        if let Some(rest) = code.strip_prefix("table[") {
            let (id, tail) = rest.split_once(']').ok_or_else(|| raised("SyntaxError"))?;
            let obj = self.lookup(parse_id(id)?)?;

            if let Some(other) = tail.strip_prefix(" == table[") {
                let other = self.lookup(parse_id(other.trim_end_matches(']'))?)?;
                return Ok(self.reply(HostValue::Bool(obj == other)));
            }
            if let Some(index) = tail.strip_prefix('[') {
                let index = index
                    .trim_end_matches(']')
                    .parse()
                    .map_err(|_| raised("SyntaxError: index"))?;
                return Ok(self.index(obj, index));
            }
            if let Some(member) = tail.strip_prefix('.') {
                return match member.split_once('(') {
                    Some((name, args)) => {
                        let args = self.args(args.strip_suffix(')').unwrap_or(args))?;
                        self.call_method(obj, name, args)
                    }
                    None => Ok(self.get(obj, member)),
                };
            }
            return Err(raised("SyntaxError"));
        }

        match self.globals.get(code).cloned() {
            Some(value) => Ok(self.reply(value)),
            None => Err(raised(format!("ReferenceError: {} is undefined", code))),
        }
    }
}

fn parse_id(text: &str) -> HostResult<u64> {
    text.trim().parse().map_err(|_| raised(format!("SyntaxError: bad id {}", text)))
}

/// `table[N]` becomes `{"$ref":N}` and `undefined` becomes `null`, so the
/// argument list parses as JSON.
fn rewrite_refs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("table[") {
        out.push_str(&rest[..start]);
        let after = &rest[start + "table[".len()..];
        let end = after.find(']').unwrap_or(after.len());
        out.push_str(&format!("{{\"$ref\":{}}}", &after[..end]));
        rest = after.get(end + 1..).unwrap_or("");
    }
    out.push_str(rest);
    out.replace("undefined", "null")
}

/// A host with one project holding one composition.
///
/// ```text
/// app.project.items      [Main]
/// Main.layers            [Title (TextLayer, 0..4), Background (AVLayer, 1..10)]
/// Main.selectedLayers    Array [Title]
/// Title.property("Opacity").value == 100
/// sum(...)               global function
/// ```
#[derive(Clone)]
pub struct FakeHost {
    state: Rc<RefCell<State>>,
}

impl FakeHost {
    pub fn new() -> Self {
        let mut state = State::default();

        let app = state.alloc("Application");
        state.arena[app].methods = vec!["beginUndoGroup".into(), "endUndoGroup".into()];
        state.set(app, "version", HostValue::Str("24.0".into()));

        let project = state.alloc("Project");
        state.set(app, "project", HostValue::Obj(project));

        let comp = state.alloc("CompItem");
        state.arena[comp].methods = vec!["layer".into()];
        state.set(comp, "name", HostValue::Str("Main".into()));
        state.set(comp, "duration", HostValue::Num(10.0));

        let items = state.alloc("ItemCollection");
        state.arena[items].elements = Some(vec![HostValue::Obj(comp)]);
        state.set(project, "items", HostValue::Obj(items));

        let title = state.alloc("TextLayer");
        state.set(title, "name", HostValue::Str("Title".into()));
        state.set(title, "inPoint", HostValue::Num(0.0));
        state.set(title, "outPoint", HostValue::Num(4.0));
        state.arena[title].methods = vec!["property".into()];

        let opacity = state.alloc("Property");
        state.set(opacity, "name", HostValue::Str("Opacity".into()));
        state.set(opacity, "value", HostValue::Num(100.0));
        state.arena[opacity].methods = vec!["setValue".into()];
        state.arena[title].properties = vec![opacity];
        state.set(title, "numProperties", HostValue::Num(1.0));

        let background = state.alloc("AVLayer");
        state.set(background, "name", HostValue::Str("Background".into()));
        state.set(background, "inPoint", HostValue::Num(1.0));
        state.set(background, "outPoint", HostValue::Num(10.0));

        let layers = state.alloc("LayerCollection");
        state.arena[layers].elements = Some(vec![HostValue::Obj(title), HostValue::Obj(background)]);
        state.arena[layers].methods = vec!["addText".into()];
        state.set(comp, "layers", HostValue::Obj(layers));

        let selected = state.alloc("Array");
        state.arena[selected].elements = Some(vec![HostValue::Obj(title)]);
        state.set(comp, "selectedLayers", HostValue::Obj(selected));

        let sum = state.alloc("Function");
        state.arena[sum].function = Some("sum".into());

        state.globals.insert("app".into(), HostValue::Obj(app));
        state.globals.insert("sum".into(), HostValue::Obj(sum));

        Self { state: Rc::new(RefCell::new(state)) }
    }

    /// Entries currently held in the host's object table.
    pub fn table_len(&self) -> usize {
        self.state.borrow().table.len()
    }

    pub fn undo_log(&self) -> Vec<String> {
        self.state.borrow().undo_log.clone()
    }

    /// Expressions evaluated so far.
    pub fn executed(&self) -> usize {
        self.state.borrow().executed
    }
}

impl Transport for FakeHost {
    fn execute(&self, code: &str) -> transport::Result<String> {
        // dispatch("<quoted code>")
        let code = match code.strip_prefix("dispatch(").and_then(|c| c.strip_suffix(')')) {
            Some(quoted) => serde_json::from_str::<String>(quoted)
                .map_err(|e| raised(format!("SyntaxError: {}", e)))?,
            None => code.to_string(),
        };
        self.state.borrow_mut().eval(&code)
    }
}
