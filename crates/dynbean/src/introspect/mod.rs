// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type introspection through registered capability tables.
//!
//! A type becomes describable by implementing [`Bean`] (usually through
//! `#[derive(Bean)]`). Its `describe` registers fields, getters, setters,
//! methods and a constructor; [`TypeDescriptor`] then classifies them the
//! way a bean introspector would:
//!
//! - zero-argument `get_x` / `getX` methods are getters of `x`
//!   (`getClass` and friends excluded),
//! - zero-argument `is_x` / `isX` methods returning bool are getters of `x`,
//! - one-argument `set_x` / `setX` methods returning nothing, or the bean
//!   itself, are setters of `x`, indexed by parameter type,
//! - static methods are never accessors.
//!
//! # Example
//!
//! ```rust
//! use dynbean::{Bean, DescriptorBuilder, Registry};
//!
//! #[derive(Default)]
//! struct Account {
//!     owner: String,
//!     active: bool,
//! }
//!
//! impl Bean for Account {
//!     fn describe(desc: DescriptorBuilder<Self>) -> DescriptorBuilder<Self> {
//!         desc.default_constructor()
//!             .getter("getOwner", |a: &Account| a.owner.clone())
//!             .setter("setOwner", |a: &mut Account, v: String| a.owner = v)
//!             .getter("isActive", |a: &Account| a.active)
//!     }
//! }
//!
//! let registry = Registry::new();
//! let desc = registry.describe_of::<Account>();
//! assert!(desc.property("owner").is_some_and(|p| p.is_writable()));
//! assert!(desc.property("active").is_some_and(|p| !p.is_writable()));
//! ```

mod builder;
mod cache;
mod descriptor;
pub mod naming;

pub use builder::{ArgumentMismatch, DescriptorBuilder, ReceiverMismatch};
pub use cache::{DescriptorCache, LookupStats};
pub use descriptor::{FieldDef, MethodDef, PropertyAccessor, SetterTable, TypeDescriptor, Visibility};
pub use naming::NameResolver;

pub(crate) use descriptor::MethodBody;

use std::any::Any;

/// A type with a registered capability table.
pub trait Bean: Any + Send + Sync + Sized {
    /// Register the type's fields, accessors, methods and constructor.
    fn describe(desc: DescriptorBuilder<Self>) -> DescriptorBuilder<Self>;
}

/// Run `T`'s registration and scan it.
pub(crate) fn build_descriptor<T: Bean>() -> TypeDescriptor {
    T::describe(DescriptorBuilder::new()).build()
}
