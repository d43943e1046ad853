// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridges between Rust types and [`Value`].
//!
//! `FromValue` is strict: it never coerces. Coercion is the converter's
//! job and happens before a value reaches a typed setter.

use crate::value::{
    ArrayRef, EnumValue, ListKind, ListRef, MapKind, MapRef, ObjectRef, PrimitiveKind, SetKind,
    SetRef, Value, ValueType,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

/// Rust types with a statically known declared [`ValueType`].
pub trait Typed {
    fn value_type() -> ValueType;
}

/// Conversion into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Strict conversion out of a [`Value`]. `None` on shape mismatch.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_scalar_bridge {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl Typed for $ty {
            fn value_type() -> ValueType {
                ValueType::Primitive(PrimitiveKind::$kind)
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar_bridge!(bool, Bool, Bool);
impl_scalar_bridge!(char, Char, Char);
impl_scalar_bridge!(i8, I8, I8);
impl_scalar_bridge!(i16, I16, I16);
impl_scalar_bridge!(i32, I32, I32);
impl_scalar_bridge!(i64, I64, I64);
impl_scalar_bridge!(u8, U8, U8);
impl_scalar_bridge!(u16, U16, U16);
impl_scalar_bridge!(u32, U32, U32);
impl_scalar_bridge!(u64, U64, U64);
impl_scalar_bridge!(f32, F32, F32);
impl_scalar_bridge!(f64, F64, F64);

impl Typed for String {
    fn value_type() -> ValueType {
        ValueType::Text
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self.into())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.to_string()),
            _ => None,
        }
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.into())
    }
}

impl Typed for Arc<str> {
    fn value_type() -> ValueType {
        ValueType::Text
    }
}

impl IntoValue for Arc<str> {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

/// Keeps the shared allocation: text identity survives the round trip.
impl FromValue for Arc<str> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl Typed for Value {
    fn value_type() -> ValueType {
        ValueType::Any
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl Typed for () {
    fn value_type() -> ValueType {
        ValueType::Void
    }
}

impl<T: Typed> Typed for Option<T> {
    fn value_type() -> ValueType {
        T::value_type().boxed()
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl IntoValue for EnumValue {
    fn into_value(self) -> Value {
        Value::Enum(self)
    }
}

impl FromValue for EnumValue {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Enum(v) => Some(v),
            _ => None,
        }
    }
}

// Shared handles alias on the way in and out.

macro_rules! impl_handle_bridge {
    ($ty:ty, $variant:ident, $declared:expr) => {
        impl Typed for $ty {
            fn value_type() -> ValueType {
                $declared
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_handle_bridge!(ListRef, List, ValueType::list_of(ValueType::Any));
impl_handle_bridge!(SetRef, Set, ValueType::set_of(ValueType::Any));
impl_handle_bridge!(
    MapRef,
    Map,
    ValueType::map_of(ValueType::Any, ValueType::Any)
);
impl_handle_bridge!(ArrayRef, Array, ValueType::array_of(ValueType::Any));
impl_handle_bridge!(ObjectRef, Object, ValueType::Any);

// Owned Rust collections are materialized fresh on every conversion.

fn sequence_items(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::List(list) => Some(list.snapshot()),
        Value::Set(set) => Some(set.snapshot()),
        Value::Array(array) => Some(array.snapshot()),
        _ => None,
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::List {
            kind: ListKind::Vec,
            element: Box::new(T::value_type()),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        let items = self.into_iter().map(IntoValue::into_value).collect();
        Value::List(ListRef::from_vec(ListKind::Vec, items))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Option<Self> {
        sequence_items(value)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: Typed> Typed for VecDeque<T> {
    fn value_type() -> ValueType {
        ValueType::List {
            kind: ListKind::Deque,
            element: Box::new(T::value_type()),
        }
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        let items = self.into_iter().map(IntoValue::into_value).collect();
        Value::List(ListRef::from_vec(ListKind::Deque, items))
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: Value) -> Option<Self> {
        sequence_items(value)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: Typed> Typed for HashSet<T> {
    fn value_type() -> ValueType {
        ValueType::Set {
            kind: SetKind::Insertion,
            element: Box::new(T::value_type()),
        }
    }
}

impl<T: IntoValue> IntoValue for HashSet<T> {
    fn into_value(self) -> Value {
        Value::Set(SetRef::from_values(
            SetKind::Insertion,
            self.into_iter().map(IntoValue::into_value),
        ))
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: Value) -> Option<Self> {
        sequence_items(value)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: Typed> Typed for BTreeSet<T> {
    fn value_type() -> ValueType {
        ValueType::Set {
            kind: SetKind::Sorted,
            element: Box::new(T::value_type()),
        }
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::Set(SetRef::from_values(
            SetKind::Sorted,
            self.into_iter().map(IntoValue::into_value),
        ))
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> Option<Self> {
        sequence_items(value)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

fn text_keyed_entries<V: FromValue>(value: Value) -> Option<Vec<(String, V)>> {
    match value {
        Value::Map(map) => map
            .snapshot()
            .into_iter()
            .map(|(k, v)| Some((String::from_value(k)?, V::from_value(v)?)))
            .collect(),
        _ => None,
    }
}

impl<V: Typed> Typed for HashMap<String, V> {
    fn value_type() -> ValueType {
        ValueType::Map {
            kind: MapKind::Insertion,
            key: Box::new(ValueType::Text),
            value: Box::new(V::value_type()),
        }
    }
}

impl<V: IntoValue> IntoValue for HashMap<String, V> {
    fn into_value(self) -> Value {
        Value::Map(MapRef::from_entries(
            MapKind::Insertion,
            self.into_iter().map(|(k, v)| (k.into_value(), v.into_value())),
        ))
    }
}

impl<V: FromValue> FromValue for HashMap<String, V> {
    fn from_value(value: Value) -> Option<Self> {
        text_keyed_entries(value).map(|entries| entries.into_iter().collect())
    }
}

impl<V: Typed> Typed for BTreeMap<String, V> {
    fn value_type() -> ValueType {
        ValueType::Map {
            kind: MapKind::Sorted,
            key: Box::new(ValueType::Text),
            value: Box::new(V::value_type()),
        }
    }
}

impl<V: IntoValue> IntoValue for BTreeMap<String, V> {
    fn into_value(self) -> Value {
        Value::Map(MapRef::from_entries(
            MapKind::Sorted,
            self.into_iter().map(|(k, v)| (k.into_value(), v.into_value())),
        ))
    }
}

impl<V: FromValue> FromValue for BTreeMap<String, V> {
    fn from_value(value: Value) -> Option<Self> {
        text_keyed_entries(value).map(|entries| entries.into_iter().collect())
    }
}

/// Implement [`Typed`], [`IntoValue`] and [`FromValue`] for a hand-written
/// [`Bean`](crate::Bean) that is `Clone`. `#[derive(Bean)]` does this itself.
#[macro_export]
macro_rules! impl_bean_value {
    ($ty:ty) => {
        impl $crate::Typed for $ty {
            fn value_type() -> $crate::ValueType {
                $crate::ValueType::Object($crate::BeanType::of::<$ty>())
            }
        }

        impl $crate::IntoValue for $ty {
            fn into_value(self) -> $crate::Value {
                $crate::Value::Object($crate::ObjectRef::new(self))
            }
        }

        impl $crate::FromValue for $ty {
            fn from_value(value: $crate::Value) -> Option<Self> {
                match value {
                    $crate::Value::Object(object) => object.get::<$ty>(),
                    _ => None,
                }
            }
        }
    };
}
