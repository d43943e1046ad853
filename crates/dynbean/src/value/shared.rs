// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared container handles with reference semantics.
//!
//! Every handle is an `Arc<RwLock<..>>`: cloning a handle aliases the same
//! container, exactly like passing a collection by reference. The duplication
//! policy in [`crate::cloner`] is what breaks the aliasing during a copy.

use crate::util::{compare_values, values_equal};
use crate::value::{ListKind, MapKind, SetKind, Value, ValueType};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct ListData {
    kind: ListKind,
    items: Vec<Value>,
}

/// Shared ordered list.
#[derive(Clone)]
pub struct ListRef(Arc<RwLock<ListData>>);

impl ListRef {
    /// Empty list of the given kind (`Interface` resolves to `Vec`).
    pub fn new(kind: ListKind) -> Self {
        Self::from_vec(kind, Vec::new())
    }

    pub fn from_vec(kind: ListKind, items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(ListData {
            kind: kind.concrete(),
            items,
        })))
    }

    pub fn kind(&self) -> ListKind {
        self.0.read().kind
    }

    pub fn len(&self) -> usize {
        self.0.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().items.is_empty()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.write().items.push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().items.get(index).cloned()
    }

    /// Replace the element at `index`. Returns false when out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.write().items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.0.write().items.clear();
    }

    /// Copy of the current elements (the elements themselves are aliased).
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().items.clone()
    }

    pub fn ptr_eq(&self, other: &ListRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.read();
        write!(f, "{:?}", data.kind)?;
        f.debug_list().entries(data.items.iter()).finish()
    }
}

#[derive(Debug)]
struct SetData {
    kind: SetKind,
    items: Vec<Value>,
    version: u64,
}

/// Shared set. Uniqueness is by value ([`values_equal`]).
#[derive(Clone)]
pub struct SetRef(Arc<RwLock<SetData>>);

impl SetRef {
    pub fn new(kind: SetKind) -> Self {
        Self(Arc::new(RwLock::new(SetData {
            kind: kind.concrete(),
            items: Vec::new(),
            version: 0,
        })))
    }

    pub fn from_values(kind: SetKind, values: impl IntoIterator<Item = Value>) -> Self {
        let set = Self::new(kind);
        for value in values {
            set.insert(value);
        }
        set
    }

    pub fn kind(&self) -> SetKind {
        self.0.read().kind
    }

    pub fn len(&self) -> usize {
        self.0.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().items.is_empty()
    }

    /// Insert unless an equal value is present. Returns true when inserted.
    ///
    /// Equality on nested containers reads their locks, and `value` may be
    /// this very set, so the duplicate check runs on a snapshot.
    pub fn insert(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        loop {
            let (items, version) = {
                let data = self.0.read();
                (data.items.clone(), data.version)
            };
            if items.iter().any(|existing| values_equal(existing, &value)) {
                return false;
            }
            let mut data = self.0.write();
            if data.version != version {
                continue;
            }
            match data.kind {
                SetKind::Sorted => {
                    let at = data
                        .items
                        .partition_point(|existing| compare_values(existing, &value).is_lt());
                    data.items.insert(at, value);
                }
                _ => data.items.push(value),
            }
            data.version += 1;
            return true;
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.snapshot().iter().any(|v| values_equal(v, value))
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().items.clone()
    }

    pub fn ptr_eq(&self, other: &SetRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for SetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.read();
        write!(f, "{:?}", data.kind)?;
        f.debug_set().entries(data.items.iter()).finish()
    }
}

#[derive(Debug)]
struct MapData {
    kind: MapKind,
    entries: Vec<(Value, Value)>,
    version: u64,
}

/// Shared map. Keys are compared by value.
#[derive(Clone)]
pub struct MapRef(Arc<RwLock<MapData>>);

impl MapRef {
    pub fn new(kind: MapKind) -> Self {
        Self(Arc::new(RwLock::new(MapData {
            kind: kind.concrete(),
            entries: Vec::new(),
            version: 0,
        })))
    }

    pub fn from_entries(kind: MapKind, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = Self::new(kind);
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    pub fn kind(&self) -> MapKind {
        self.0.read().kind
    }

    pub fn len(&self) -> usize {
        self.0.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().entries.is_empty()
    }

    /// Position of `key` and the version it was found at. Keys are
    /// compared on a snapshot: a container key may be this very map.
    fn locate(&self, key: &Value) -> (Option<usize>, u64) {
        let (entries, version) = {
            let data = self.0.read();
            (data.entries.clone(), data.version)
        };
        (entries.iter().position(|(k, _)| values_equal(k, key)), version)
    }

    /// Insert or replace. Returns the previous value for the key.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let (key, value) = (key.into(), value.into());
        loop {
            let (at, version) = self.locate(&key);
            let mut data = self.0.write();
            if data.version != version {
                continue;
            }
            data.version += 1;
            if let Some(at) = at {
                return Some(std::mem::replace(&mut data.entries[at].1, value));
            }
            match data.kind {
                MapKind::Sorted => {
                    let at = data
                        .entries
                        .partition_point(|(k, _)| compare_values(k, &key).is_lt());
                    data.entries.insert(at, (key, value));
                }
                _ => data.entries.push((key, value)),
            }
            return None;
        }
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.snapshot()
            .into_iter()
            .find(|(k, _)| values_equal(k, key))
            .map(|(_, v)| v)
    }

    /// Lookup by text key.
    pub fn get_str(&self, key: &str) -> Option<Value> {
        self.0
            .read()
            .entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v.clone())
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        loop {
            let (at, version) = self.locate(key);
            let at = at?;
            let mut data = self.0.write();
            if data.version != version {
                continue;
            }
            data.version += 1;
            return Some(data.entries.remove(at).1);
        }
    }

    pub fn snapshot(&self) -> Vec<(Value, Value)> {
        self.0.read().entries.clone()
    }

    pub fn ptr_eq(&self, other: &MapRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for MapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.read();
        write!(f, "{:?}", data.kind)?;
        f.debug_map()
            .entries(data.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

#[derive(Debug)]
struct ArrayData {
    component: ValueType,
    items: Vec<Value>,
}

/// Shared fixed-length array with a declared component type.
#[derive(Clone)]
pub struct ArrayRef(Arc<RwLock<ArrayData>>);

impl ArrayRef {
    /// Array of `len` nulls.
    pub fn new(component: ValueType, len: usize) -> Self {
        Self::from_vec(component, vec![Value::Null; len])
    }

    pub fn from_vec(component: ValueType, items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(ArrayData { component, items })))
    }

    pub fn component(&self) -> ValueType {
        self.0.read().component.clone()
    }

    pub fn len(&self) -> usize {
        self.0.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().items.get(index).cloned()
    }

    /// Store at `index`. Returns false when out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.write().items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().items.clone()
    }

    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.read();
        write!(f, "[{}]", data.component)?;
        f.debug_list().entries(data.items.iter()).finish()
    }
}
