// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bean type handles, shared bean instances and enum values.

use crate::introspect::{build_descriptor, Bean, TypeDescriptor};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Type-erased bean instance as stored behind an [`ObjectRef`].
pub type AnyBean = Box<dyn Any + Send + Sync>;

/// Runtime handle for a registered bean type (the "class object").
///
/// Equality and hashing use the Rust `TypeId` only.
#[derive(Clone, Copy)]
pub struct BeanType {
    id: TypeId,
    name: &'static str,
    build: fn() -> TypeDescriptor,
}

impl BeanType {
    /// Handle for `T`.
    pub fn of<T: Bean>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            build: build_descriptor::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Run the type's registration and scan it into a fresh descriptor.
    pub(crate) fn build(&self) -> TypeDescriptor {
        (self.build)()
    }
}

impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BeanType {}

impl Hash for BeanType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeanType({})", self.name)
    }
}

/// Shared, mutable bean instance with reference semantics.
///
/// Cloning an `ObjectRef` aliases the same instance; use
/// [`ObjectRef::ptr_eq`] to test identity.
#[derive(Clone)]
pub struct ObjectRef {
    bean_type: BeanType,
    inner: Arc<RwLock<AnyBean>>,
}

impl ObjectRef {
    /// Wrap a bean instance.
    pub fn new<T: Bean>(value: T) -> Self {
        Self {
            bean_type: BeanType::of::<T>(),
            inner: Arc::new(RwLock::new(Box::new(value))),
        }
    }

    /// Wrap an already erased instance. `instance` must be of `bean_type`.
    pub(crate) fn from_boxed(bean_type: BeanType, instance: AnyBean) -> Self {
        debug_assert_eq!(
            (*instance).type_id(),
            bean_type.id(),
            "erased instance must match its bean type"
        );
        Self {
            bean_type,
            inner: Arc::new(RwLock::new(instance)),
        }
    }

    pub fn bean_type(&self) -> BeanType {
        self.bean_type
    }

    /// Do both handles point at the same instance?
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity key (stable while the instance is alive).
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, AnyBean> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, AnyBean> {
        self.inner.write()
    }

    /// Borrow the instance as `T`. `None` if it is another type.
    pub fn with<T: Bean, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.inner.read();
        guard.downcast_ref::<T>().map(f)
    }

    /// Mutably borrow the instance as `T`. `None` if it is another type.
    pub fn with_mut<T: Bean, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.inner.write();
        guard.downcast_mut::<T>().map(f)
    }

    /// Clone the instance out as `T`.
    pub fn get<T: Bean + Clone>(&self) -> Option<T> {
        self.with(|value: &T| value.clone())
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}@{:#x})", self.bean_type.short_name(), self.addr())
    }
}

/// An enumeration constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Enumeration type name.
    pub type_name: Arc<str>,
    /// Variant name.
    pub variant: Arc<str>,
    /// Declaration index of the variant.
    pub ordinal: i64,
}

impl EnumValue {
    pub fn new(type_name: impl Into<Arc<str>>, variant: impl Into<Arc<str>>, ordinal: i64) -> Self {
        Self {
            type_name: type_name.into(),
            variant: variant.into(),
            ordinal,
        }
    }
}
