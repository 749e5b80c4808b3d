//! Mutable, parent-linked view over decoded documents
//!
//! A document is stored as an arena of nodes. Every node records the index of
//! its parent, so [`Value::parent`] is a lookup rather than a back pointer.
//! Handles ([`Value`], [`Map`], [`Slice`]) are cheap to clone and all refer to
//! the same shared arena.
//!
//! Writes never alias: setting a field or element builds a fresh subtree in the
//! arena and swaps it into the parent's slot. The replaced subtree stays
//! readable through existing handles but is detached (its parent is `None`).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};

type NodeId = usize;

#[derive(Debug)]
enum NodeData {
    Map(BTreeMap<String, NodeId>),
    Slice(Vec<NodeId>),
    Scalar(JsonValue),
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    /// Add a decoded value (and all its descendants) to the arena
    fn insert(&mut self, value: JsonValue, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            parent,
            data: NodeData::Scalar(JsonValue::Null),
        });

        let data = match value {
            JsonValue::Object(map) => NodeData::Map(
                map.into_iter()
                    .map(|(key, child)| (key, self.insert(child, Some(id))))
                    .collect(),
            ),
            JsonValue::Array(items) => NodeData::Slice(
                items
                    .into_iter()
                    .map(|child| self.insert(child, Some(id)))
                    .collect(),
            ),
            scalar => NodeData::Scalar(scalar),
        };

        self.nodes[id].data = data;
        id
    }

    fn to_json(&self, id: NodeId) -> JsonValue {
        match &self.nodes[id].data {
            NodeData::Map(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(key, child)| (key.clone(), self.to_json(*child)))
                    .collect(),
            ),
            NodeData::Slice(items) => {
                JsonValue::Array(items.iter().map(|child| self.to_json(*child)).collect())
            }
            NodeData::Scalar(scalar) => scalar.clone(),
        }
    }

    fn detach(&mut self, id: NodeId) {
        self.nodes[id].parent = None;
    }
}

/// Shape of a value in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Map,
    Slice,
    String,
    Number,
    Bool,
    Null,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Map => "map",
            Kind::Slice => "slice",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Bool => "bool",
            Kind::Null => "null",
        };
        f.write_str(name)
    }
}

/// Handle to any node of a document tree
#[derive(Clone)]
pub struct Value {
    arena: Rc<RefCell<Arena>>,
    id: NodeId,
}

impl Value {
    /// Build a new tree from a decoded document and return its root
    pub fn new(document: JsonValue) -> Self {
        let mut arena = Arena::default();
        let id = arena.insert(document, None);
        Self {
            arena: Rc::new(RefCell::new(arena)),
            id,
        }
    }

    fn handle(&self, id: NodeId) -> Value {
        Value {
            arena: Rc::clone(&self.arena),
            id,
        }
    }

    pub fn kind(&self) -> Kind {
        match &self.arena.borrow().nodes[self.id].data {
            NodeData::Map(_) => Kind::Map,
            NodeData::Slice(_) => Kind::Slice,
            NodeData::Scalar(JsonValue::String(_)) => Kind::String,
            NodeData::Scalar(JsonValue::Number(_)) => Kind::Number,
            NodeData::Scalar(JsonValue::Bool(_)) => Kind::Bool,
            NodeData::Scalar(_) => Kind::Null,
        }
    }

    /// Container holding this value, `None` for a root or a detached value
    pub fn parent(&self) -> Option<Value> {
        let parent = self.arena.borrow().nodes[self.id].parent;
        parent.map(|id| self.handle(id))
    }

    /// Whether both handles point at the same node of the same tree
    pub fn same(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena) && self.id == other.id
    }

    pub fn as_map(&self) -> Option<Map> {
        (self.kind() == Kind::Map).then(|| Map(self.clone()))
    }

    pub fn as_slice(&self) -> Option<Slice> {
        (self.kind() == Kind::Slice).then(|| Slice(self.clone()))
    }

    pub fn as_str(&self) -> Option<String> {
        match &self.arena.borrow().nodes[self.id].data {
            NodeData::Scalar(JsonValue::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match &self.arena.borrow().nodes[self.id].data {
            NodeData::Scalar(JsonValue::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.arena.borrow().nodes[self.id].data {
            NodeData::Scalar(JsonValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    /// Materialize this subtree back into a decoded document
    pub fn to_json(&self) -> JsonValue {
        self.arena.borrow().to_json(self.id)
    }

    /// Replace this value with `document`
    ///
    /// For a value inside a container the parent's slot is swapped and the
    /// handle to the new value is returned; this handle becomes detached.
    /// A root (or already detached) value is rewritten in place.
    pub fn set(&self, document: JsonValue) -> Value {
        let Some(parent) = self.parent() else {
            self.overwrite(document);
            return self.clone();
        };

        let slot = {
            let arena = self.arena.borrow();
            match &arena.nodes[parent.id].data {
                NodeData::Map(fields) => fields
                    .iter()
                    .find(|(_, child)| **child == self.id)
                    .map(|(key, _)| Slot::Key(key.clone())),
                NodeData::Slice(items) => {
                    items.iter().position(|child| *child == self.id).map(Slot::Index)
                }
                NodeData::Scalar(_) => None,
            }
        };

        match slot {
            Some(Slot::Key(key)) => Map(parent).set(&key, document),
            Some(Slot::Index(index)) => Slice(parent).replace(index, document),
            None => {
                self.overwrite(document);
                self.clone()
            }
        }
    }

    fn overwrite(&self, document: JsonValue) {
        let mut arena = self.arena.borrow_mut();
        let staged = arena.insert(document, None);
        let data = std::mem::replace(
            &mut arena.nodes[staged].data,
            NodeData::Scalar(JsonValue::Null),
        );

        let old_children: Vec<NodeId> = match &arena.nodes[self.id].data {
            NodeData::Map(fields) => fields.values().copied().collect(),
            NodeData::Slice(items) => items.clone(),
            NodeData::Scalar(_) => Vec::new(),
        };
        for child in old_children {
            arena.detach(child);
        }

        let new_children: Vec<NodeId> = match &data {
            NodeData::Map(fields) => fields.values().copied().collect(),
            NodeData::Slice(items) => items.clone(),
            NodeData::Scalar(_) => Vec::new(),
        };
        for child in new_children {
            arena.nodes[child].parent = Some(self.id);
        }

        arena.nodes[self.id].data = data;
    }
}

enum Slot {
    Key(String),
    Index(usize),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.to_json())
    }
}

/// Handle to a map node
#[derive(Clone, Debug)]
pub struct Map(Value);

impl Map {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn with_fields<R>(&self, f: impl FnOnce(&BTreeMap<String, NodeId>) -> R) -> R {
        let arena = self.0.arena.borrow();
        match &arena.nodes[self.0.id].data {
            NodeData::Map(fields) => f(fields),
            // Map handles are only created for map nodes and a node's shape
            // only changes through `overwrite`, which keeps old handles valid.
            _ => f(&BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.with_fields(|fields| fields.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field names in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.with_fields(|fields| fields.keys().cloned().collect())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let id = self.with_fields(|fields| fields.get(key).copied())?;
        Some(self.0.handle(id))
    }

    /// Fields in sorted key order
    pub fn entries(&self) -> Vec<(String, Value)> {
        let ids: Vec<(String, NodeId)> =
            self.with_fields(|fields| fields.iter().map(|(k, v)| (k.clone(), *v)).collect());
        ids.into_iter()
            .map(|(key, id)| (key, self.0.handle(id)))
            .collect()
    }

    /// Store `document` under `key`, replacing (and detaching) any previous value
    pub fn set(&self, key: &str, document: JsonValue) -> Value {
        let mut arena = self.0.arena.borrow_mut();
        let child = arena.insert(document, Some(self.0.id));
        let previous = match &mut arena.nodes[self.0.id].data {
            NodeData::Map(fields) => fields.insert(key.to_string(), child),
            _ => None,
        };
        if let Some(previous) = previous {
            arena.detach(previous);
        }
        drop(arena);
        self.0.handle(child)
    }

    /// Remove `key`, returning the detached value if it was present
    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut arena = self.0.arena.borrow_mut();
        let removed = match &mut arena.nodes[self.0.id].data {
            NodeData::Map(fields) => fields.remove(key),
            _ => None,
        };
        if let Some(id) = removed {
            arena.detach(id);
        }
        drop(arena);
        removed.map(|id| self.0.handle(id))
    }

    pub fn to_json(&self) -> JsonValue {
        self.0.to_json()
    }
}

/// Handle to a sequence node
#[derive(Clone, Debug)]
pub struct Slice(Value);

impl Slice {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn items(&self) -> Vec<NodeId> {
        let arena = self.0.arena.borrow();
        match &arena.nodes[self.0.id].data {
            NodeData::Slice(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn at(&self, index: usize) -> Option<Value> {
        self.items().get(index).map(|id| self.0.handle(*id))
    }

    pub fn last(&self) -> Option<Value> {
        self.items().last().map(|id| self.0.handle(*id))
    }

    /// Elements in order
    pub fn values(&self) -> Vec<Value> {
        self.items()
            .into_iter()
            .map(|id| self.0.handle(id))
            .collect()
    }

    /// Replace the element at `index`
    pub fn set(&self, index: usize, document: JsonValue) -> Result<Value> {
        let len = self.len();
        if index >= len {
            return Err(CoreError::IndexOutOfRange { index, len });
        }
        Ok(self.replace(index, document))
    }

    fn replace(&self, index: usize, document: JsonValue) -> Value {
        let mut arena = self.0.arena.borrow_mut();
        let child = arena.insert(document, Some(self.0.id));
        let previous = match &mut arena.nodes[self.0.id].data {
            NodeData::Slice(items) => Some(std::mem::replace(&mut items[index], child)),
            _ => None,
        };
        if let Some(previous) = previous {
            arena.detach(previous);
        }
        drop(arena);
        self.0.handle(child)
    }

    /// Push `document` at the end of the sequence
    pub fn append(&self, document: JsonValue) -> Value {
        let mut arena = self.0.arena.borrow_mut();
        let child = arena.insert(document, Some(self.0.id));
        if let NodeData::Slice(items) = &mut arena.nodes[self.0.id].data {
            items.push(child);
        }
        drop(arena);
        self.0.handle(child)
    }

    pub fn to_json(&self) -> JsonValue {
        self.0.to_json()
    }
}
