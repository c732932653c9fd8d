//! The reactive key/value store bridging controls and application state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::value::Value;
use crate::app::System;
use crate::dom::ElementId;

/// A click handler, looked up by name from `ezClick`.
///
/// Called with the activated element, the system facade and the data store.
/// Handlers run synchronously on the engine thread and must not block.
pub type Handler = Rc<dyn Fn(ElementId, &mut System<'_>, &mut DataModel)>;

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

/// A shared, settable view of one key.
///
/// Cloning a proxy yields another handle to the same slot. The store writes
/// through it on every update of the key it is bound to.
#[derive(Clone, Default)]
pub struct Proxy(Rc<RefCell<Value>>);

impl Proxy {
    /// Read the latest value.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    fn set(&self, value: &Value) {
        *self.0.borrow_mut() = value.clone();
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Proxy").field(&*self.0.borrow()).finish()
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// The notification target attached to a key.
pub enum Binding {
    /// A settable proxy, written with each new value.
    Proxy(Proxy),
    /// A callback invoked with the key and the new value.
    Callback(Box<dyn FnMut(&str, &Value)>),
}

impl Binding {
    fn notify(&mut self, key: &str, value: &Value) {
        match self {
            Binding::Proxy(p) => p.set(value),
            Binding::Callback(f) => f(key, value),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Proxy(p) => f.debug_tuple("Proxy").field(p).finish(),
            Binding::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// DataModel
// ---------------------------------------------------------------------------

/// Key/value store with at most one binding per key and named handlers.
#[derive(Default)]
pub struct DataModel {
    values: HashMap<String, Value>,
    bindings: HashMap<String, Binding>,
    handlers: HashMap<String, Handler>,
}

impl DataModel {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without notifying.
    pub fn bind(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Write a value, then notify the key's binding.
    pub fn update(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        self.values.insert(key.to_owned(), value);
        if let (Some(binding), Some(value)) = (self.bindings.get_mut(key), self.values.get(key)) {
            binding.notify(key, value);
        }
    }

    /// Read a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a value, or `default` when the key is unset.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.values.get(key).cloned().unwrap_or_else(|| default.into())
    }

    /// Read a value as display text (empty when unset).
    pub fn text(&self, key: &str) -> String {
        self.values.get(key).map(Value::to_string).unwrap_or_default()
    }

    /// Whether a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Attach a binding to `key`, replacing any previous one.
    pub fn set_binding(&mut self, key: impl Into<String>, binding: Binding) {
        self.bindings.insert(key.into(), binding);
    }

    /// Attach a callback binding to `key`.
    pub fn watch(&mut self, key: impl Into<String>, callback: impl FnMut(&str, &Value) + 'static) {
        self.set_binding(key, Binding::Callback(Box::new(callback)));
    }

    /// Attach a proxy binding to `key` and return a handle to it.
    ///
    /// The proxy starts out holding the key's current value.
    pub fn proxy(&mut self, key: impl Into<String>) -> Proxy {
        let key = key.into();
        let proxy = Proxy::default();
        if let Some(v) = self.values.get(&key) {
            proxy.set(v);
        }
        self.set_binding(key, Binding::Proxy(proxy.clone()));
        proxy
    }

    /// Register a named click handler.
    pub fn on(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(ElementId, &mut System<'_>, &mut DataModel) + 'static,
    ) {
        self.handlers.insert(name.into(), Rc::new(handler));
    }

    /// Look up a handler by name.
    pub fn handler(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).cloned()
    }
}

impl fmt::Debug for DataModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataModel")
            .field("values", &self.values)
            .field("bindings", &self.bindings)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
