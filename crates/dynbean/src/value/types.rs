// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared types for properties, method parameters and container elements.

use crate::value::BeanType;
use std::fmt;
use std::sync::Arc;

/// Primitive scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Lowercase Rust spelling of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Integer kinds (signed or unsigned).
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }

    /// Floating point kinds.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Integer or float.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }
}

/// Concrete list implementations. `Interface` binds to [`ListKind::Vec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListKind {
    #[default]
    Interface,
    Vec,
    Deque,
}

impl ListKind {
    /// Resolve the abstract kind to its default implementation.
    #[must_use]
    pub fn concrete(self) -> Self {
        match self {
            Self::Interface => Self::Vec,
            other => other,
        }
    }
}

/// Concrete set implementations. `Interface` binds to [`SetKind::Insertion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SetKind {
    #[default]
    Interface,
    /// Keeps first-insertion order.
    Insertion,
    /// Keeps elements ordered by value.
    Sorted,
}

impl SetKind {
    #[must_use]
    pub fn concrete(self) -> Self {
        match self {
            Self::Interface => Self::Insertion,
            other => other,
        }
    }
}

/// Concrete map implementations. `Interface` binds to [`MapKind::Insertion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapKind {
    #[default]
    Interface,
    Insertion,
    Sorted,
}

impl MapKind {
    #[must_use]
    pub fn concrete(self) -> Self {
        match self {
            Self::Interface => Self::Insertion,
            other => other,
        }
    }
}

/// A declared type.
///
/// Runtime values are always "boxed": a `Value::I32` reports
/// `Boxed(PrimitiveKind::I32)`. A property declared `Primitive(..)` cannot
/// hold `Value::Null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Accepts anything, including null.
    Any,
    /// Return type of procedures.
    Void,
    /// Non-nullable scalar.
    Primitive(PrimitiveKind),
    /// Nullable scalar (`Option<T>` on the Rust side).
    Boxed(PrimitiveKind),
    Text,
    /// Enumeration, identified by its type name.
    Enum(Arc<str>),
    List {
        kind: ListKind,
        element: Box<ValueType>,
    },
    Set {
        kind: SetKind,
        element: Box<ValueType>,
    },
    Map {
        kind: MapKind,
        key: Box<ValueType>,
        value: Box<ValueType>,
    },
    /// Fixed-length array of a component type.
    Array(Box<ValueType>),
    /// Registered bean type.
    Object(BeanType),
}

impl ValueType {
    /// List of `element` bound to the default list implementation.
    pub fn list_of(element: ValueType) -> Self {
        Self::List {
            kind: ListKind::Interface,
            element: Box::new(element),
        }
    }

    pub fn set_of(element: ValueType) -> Self {
        Self::Set {
            kind: SetKind::Interface,
            element: Box::new(element),
        }
    }

    pub fn map_of(key: ValueType, value: ValueType) -> Self {
        Self::Map {
            kind: MapKind::Interface,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn array_of(component: ValueType) -> Self {
        Self::Array(Box::new(component))
    }

    /// Can a property of this type hold null?
    pub fn is_nullable(&self) -> bool {
        !matches!(self, Self::Primitive(_) | Self::Void)
    }

    /// List, set, map or array.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::List { .. } | Self::Set { .. } | Self::Map { .. } | Self::Array(_)
        )
    }

    /// List, set or array (element-wise containers).
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::List { .. } | Self::Set { .. } | Self::Array(_))
    }

    /// Declared element type of a list, set or array; value type of a map.
    pub fn element_type(&self) -> Option<&ValueType> {
        match self {
            Self::List { element, .. } | Self::Set { element, .. } => Some(element),
            Self::Array(component) => Some(component),
            Self::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The primitive kind of a primitive or boxed type.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) | Self::Boxed(kind) => Some(*kind),
            _ => None,
        }
    }

    /// `Primitive(k)` becomes `Boxed(k)`; everything else is unchanged.
    #[must_use]
    pub fn boxed(&self) -> Self {
        match self {
            Self::Primitive(kind) => Self::Boxed(*kind),
            other => other.clone(),
        }
    }

    /// `Boxed(k)` becomes `Primitive(k)`; everything else is unchanged.
    #[must_use]
    pub fn unboxed(&self) -> Self {
        match self {
            Self::Boxed(kind) => Self::Primitive(*kind),
            other => other.clone(),
        }
    }

    /// The bean type of an `Object` type.
    pub fn bean_type(&self) -> Option<BeanType> {
        match self {
            Self::Object(bean) => Some(*bean),
            _ => None,
        }
    }

    /// Can a non-null value of runtime type `runtime` be stored, as is, in
    /// a slot declared `self`?
    ///
    /// Boxing is transparent. Container element types are erased at runtime,
    /// so containers only match on shape and on concrete kind when the slot
    /// names one.
    pub fn accepts(&self, runtime: &ValueType) -> bool {
        match (self, runtime) {
            (Self::Any, _) => true,
            (Self::Void, _) => false,
            (Self::Primitive(a) | Self::Boxed(a), Self::Primitive(b) | Self::Boxed(b)) => a == b,
            (Self::Text, Self::Text) => true,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::List { kind: a, .. }, Self::List { kind: b, .. }) => {
                *a == ListKind::Interface || a.concrete() == b.concrete()
            }
            (Self::Set { kind: a, .. }, Self::Set { kind: b, .. }) => {
                *a == SetKind::Interface || a.concrete() == b.concrete()
            }
            (Self::Map { kind: a, .. }, Self::Map { kind: b, .. }) => {
                *a == MapKind::Interface || a.concrete() == b.concrete()
            }
            (Self::Array(a), Self::Array(b)) => **a == Self::Any || a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Void => write!(f, "void"),
            Self::Primitive(kind) => write!(f, "{}", kind.name()),
            Self::Boxed(kind) => write!(f, "Option<{}>", kind.name()),
            Self::Text => write!(f, "text"),
            Self::Enum(name) => write!(f, "enum {}", name),
            Self::List { kind, element } => write!(f, "list<{}>({:?})", element, kind),
            Self::Set { kind, element } => write!(f, "set<{}>({:?})", element, kind),
            Self::Map { kind, key, value } => write!(f, "map<{}, {}>({:?})", key, value, kind),
            Self::Array(component) => write!(f, "[{}]", component),
            Self::Object(bean) => write!(f, "{}", bean.short_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_is_boxing_transparent() {
        let int = ValueType::Primitive(PrimitiveKind::I32);
        assert!(int.accepts(&ValueType::Boxed(PrimitiveKind::I32)));
        assert!(ValueType::Boxed(PrimitiveKind::I32).accepts(&int));
        assert!(!int.accepts(&ValueType::Boxed(PrimitiveKind::I64)));
        assert!(!int.accepts(&ValueType::Text));
    }

    #[test]
    fn test_accepts_containers_by_shape() {
        let runtime_vec = ValueType::List {
            kind: ListKind::Vec,
            element: Box::new(ValueType::Any),
        };
        assert!(ValueType::list_of(ValueType::Text).accepts(&runtime_vec));

        let deque = ValueType::List {
            kind: ListKind::Deque,
            element: Box::new(ValueType::Text),
        };
        assert!(!deque.accepts(&runtime_vec));
        assert!(!ValueType::set_of(ValueType::Text).accepts(&runtime_vec));
    }

    #[test]
    fn test_any_accepts_everything_void_nothing() {
        assert!(ValueType::Any.accepts(&ValueType::Text));
        assert!(!ValueType::Void.accepts(&ValueType::Text));
        assert!(!ValueType::Primitive(PrimitiveKind::Bool).is_nullable());
        assert!(ValueType::Boxed(PrimitiveKind::Bool).is_nullable());
    }

    #[test]
    fn test_interface_kinds_bind_to_defaults() {
        assert_eq!(ListKind::Interface.concrete(), ListKind::Vec);
        assert_eq!(SetKind::Interface.concrete(), SetKind::Insertion);
        assert_eq!(MapKind::Sorted.concrete(), MapKind::Sorted);
    }
}
