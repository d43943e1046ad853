// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values.
//!
//! [`Value`] is what flows through every getter, setter, converter and
//! method invocation. Scalars and text are immutable; containers and beans
//! are shared handles with reference semantics.

mod bridge;
mod enums;
mod object;
mod shared;
mod types;

pub use bridge::{FromValue, IntoValue, Typed};
pub use enums::BeanEnum;
pub use object::{AnyBean, BeanType, EnumValue, ObjectRef};
pub use shared::{ArrayRef, ListRef, MapRef, SetRef};
pub use types::{ListKind, MapKind, PrimitiveKind, SetKind, ValueType};

use std::sync::Arc;

/// A dynamic value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,

    // Scalars
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(Arc<str>),
    Enum(EnumValue),

    // Shared containers
    List(ListRef),
    Set(SetRef),
    Map(MapRef),
    Array(ArrayRef),

    // Bean instance
    Object(ObjectRef),
}

impl Value {
    /// Text value.
    pub fn text(value: impl Into<Arc<str>>) -> Self {
        Self::Text(value.into())
    }

    /// New `Vec` list holding `items`.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(ListRef::from_vec(ListKind::Vec, items.into_iter().collect()))
    }

    /// New insertion-ordered set holding `items`.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Set(SetRef::from_values(SetKind::Insertion, items))
    }

    /// New insertion-ordered map with text keys.
    pub fn map<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(MapRef::from_entries(
            MapKind::Insertion,
            entries
                .into_iter()
                .map(|(key, value)| (Value::Text(key.into()), value)),
        ))
    }

    /// Wrap a bean.
    pub fn object<T: crate::Bean>(bean: T) -> Self {
        Self::Object(ObjectRef::new(bean))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text, numeric, boolean, char or enum: values that never need copying.
    pub fn is_immutable(&self) -> bool {
        !matches!(
            self,
            Self::List(_) | Self::Set(_) | Self::Map(_) | Self::Array(_) | Self::Object(_)
        )
    }

    /// List, set, map or array.
    pub fn is_container_value(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Set(_) | Self::Map(_) | Self::Array(_)
        )
    }

    /// The runtime type of the value. Scalars report their boxed type; null
    /// reports [`ValueType::Any`]. Container element types are not tracked
    /// at runtime and report `Any`.
    pub fn runtime_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Any,
            Self::Bool(_) => ValueType::Boxed(PrimitiveKind::Bool),
            Self::Char(_) => ValueType::Boxed(PrimitiveKind::Char),
            Self::I8(_) => ValueType::Boxed(PrimitiveKind::I8),
            Self::I16(_) => ValueType::Boxed(PrimitiveKind::I16),
            Self::I32(_) => ValueType::Boxed(PrimitiveKind::I32),
            Self::I64(_) => ValueType::Boxed(PrimitiveKind::I64),
            Self::U8(_) => ValueType::Boxed(PrimitiveKind::U8),
            Self::U16(_) => ValueType::Boxed(PrimitiveKind::U16),
            Self::U32(_) => ValueType::Boxed(PrimitiveKind::U32),
            Self::U64(_) => ValueType::Boxed(PrimitiveKind::U64),
            Self::F32(_) => ValueType::Boxed(PrimitiveKind::F32),
            Self::F64(_) => ValueType::Boxed(PrimitiveKind::F64),
            Self::Text(_) => ValueType::Text,
            Self::Enum(e) => ValueType::Enum(e.type_name.clone()),
            Self::List(list) => ValueType::List {
                kind: list.kind(),
                element: Box::new(ValueType::Any),
            },
            Self::Set(set) => ValueType::Set {
                kind: set.kind(),
                element: Box::new(ValueType::Any),
            },
            Self::Map(map) => ValueType::Map {
                kind: map.kind(),
                key: Box::new(ValueType::Any),
                value: Box::new(ValueType::Any),
            },
            Self::Array(array) => ValueType::Array(Box::new(array.component())),
            Self::Object(object) => ValueType::Object(object.bean_type()),
        }
    }

    /// Short label used in diagnostics and log lines.
    pub fn type_label(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            other => other.runtime_type().to_string(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer that fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::U8(v) => Some(i64::from(*v)),
            Self::U16(v) => Some(i64::from(*v)),
            Self::U32(v) => Some(i64::from(*v)),
            Self::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Any numeric value as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            Self::U64(v) => Some(*v as f64),
            Self::I64(v) => Some(*v as f64),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetRef> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a list, set or array (aliased, not duplicated).
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Self::List(list) => Some(list.snapshot()),
            Self::Set(set) => Some(set.snapshot()),
            Self::Array(array) => Some(array.snapshot()),
            _ => None,
        }
    }

    /// Do both values refer to the same shared instance? Text compares by
    /// allocation; scalars are never identical.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => a.ptr_eq(b),
            (Self::Set(a), Self::Set(b)) => a.ptr_eq(b),
            (Self::Map(a), Self::Map(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => a.ptr_eq(b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Identity key of a shared container or bean, for cycle detection.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Self::List(v) => Some(v.addr()),
            Self::Set(v) => Some(v.addr()),
            Self::Map(v) => Some(v.addr()),
            Self::Array(v) => Some(v.addr()),
            Self::Object(v) => Some(v.addr()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

/// Deep value equality; beans compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::util::values_equal(self, other)
    }
}

macro_rules! impl_from_scalar {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_scalar!(bool, Bool);
impl_from_scalar!(char, Char);
impl_from_scalar!(i8, I8);
impl_from_scalar!(i16, I16);
impl_from_scalar!(i32, I32);
impl_from_scalar!(i64, I64);
impl_from_scalar!(u8, U8);
impl_from_scalar!(u16, U16);
impl_from_scalar!(u32, U32);
impl_from_scalar!(u64, U64);
impl_from_scalar!(f32, F32);
impl_from_scalar!(f64, F64);
impl_from_scalar!(EnumValue, Enum);
impl_from_scalar!(ListRef, List);
impl_from_scalar!(SetRef, Set);
impl_from_scalar!(MapRef, Map);
impl_from_scalar!(ArrayRef, Array);
impl_from_scalar!(ObjectRef, Object);

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
