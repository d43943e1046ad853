// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dynbean - Dynamic object-graph mapping and invocation
//!
//! Copy, convert and invoke across unrelated structured values (beans, maps,
//! containers) at runtime, by property name, with on-the-fly type coercion.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynbean::{Bean, Registry, Value};
//!
//! #[derive(Bean, Debug, Clone, Default)]
//! #[bean(default)]
//! struct User {
//!     pub id: i64,
//!     pub user_name: String,
//!     pub tags: Vec<String>,
//! }
//!
//! # fn main() -> dynbean::Result<()> {
//! let registry = Registry::new();
//! let row = Value::map(vec![
//!     ("ID", Value::text("5")),
//!     ("USER_NAME", Value::text("ada")),
//!     ("tags", Value::list(vec![Value::text("admin")])),
//! ]);
//!
//! let user = Value::object(User::default());
//! registry.copy_properties(&row, &user, true)?;
//!
//! assert_eq!(registry.get_value(&user, "id")?, Value::I64(5));
//! assert_eq!(registry.get_value_ci(&user, "UserName")?, Value::text("ada"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                          Registry (facade)                          |
//! |  describe | get/set_value | copy_properties | convert | invoke      |
//! +---------------------------------------------------------------------+
//! |  GraphCopier  ->  PropertyAccessor  ->  Cloner  |  MethodDispatcher |
//! +---------------------------------------------------------------------+
//! |  TypeDescriptor + NameResolver (cached once per type)               |
//! +---------------------------------------------------------------------+
//! |  Converter (scalar coercion)  |  Value / ValueType (dynamic model)  |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Registry`] | Owned engine: caches, converter, default copy options |
//! | [`Bean`] | Capability table of a type (derive or implement by hand) |
//! | [`TypeDescriptor`] | Immutable per-type properties, methods, constructor |
//! | [`Value`] | Dynamic value: scalars, text, shared containers, beans |
//! | [`Converter`] | Pluggable scalar coercion |
//! | [`CopyReport`] | Which properties a copy assigned or skipped |
//!
//! ## Error Model
//!
//! Shape mismatches are soft: absent properties read as null, rejected
//! assignments return `false`, skipped copies land in a [`CopyReport`].
//! Faults raised by accessor bodies, missing constructors, unresolved
//! methods and cycles (under [`CyclePolicy::Error`]) are [`MappingError`]s.

// Allow the derive macros to work inside this crate's tests
extern crate self as dynbean;

/// Property get/set bound to descriptors.
mod access;
/// Value duplication policy.
pub mod cloner;
/// Compile-time defaults and registry configuration.
pub mod config;
/// Scalar coercion service.
pub mod convert;
/// Whole-object property copy with cycle guard and diagnostics.
pub mod copier;
/// Method invocation by name with cached overload resolution.
pub mod dispatch;
/// Error types.
pub mod error;
/// Capability tables, descriptors and the descriptor cache.
pub mod introspect;
/// The engine facade.
pub mod registry;
/// Value helpers: emptiness, deep equality, hashing, assignability memo.
pub mod util;
/// Dynamic value model.
pub mod value;

pub use cloner::Cloner;
pub use config::{CachePolicy, CopyOptions, CyclePolicy, RegistryConfig};
pub use convert::{Coercer, Converter, ConverterRegistry, ScalarConverter};
pub use copier::{CopyReport, GraphCopier, SkipReason, Skipped};
pub use dispatch::MethodDispatcher;
pub use error::{BoxError, ConvertError, MappingError, Result};
pub use introspect::{
    ArgumentMismatch, Bean, DescriptorBuilder, DescriptorCache, FieldDef, LookupStats, MethodDef,
    NameResolver, PropertyAccessor, SetterTable, TypeDescriptor, Visibility,
};
pub use registry::{Registry, RegistryBuilder};
pub use value::{
    AnyBean, ArrayRef, BeanEnum, BeanType, EnumValue, FromValue, IntoValue, ListKind, ListRef,
    MapKind, MapRef, ObjectRef, PrimitiveKind, SetKind, SetRef, Typed, Value, ValueType,
};

#[cfg(feature = "config-loaders")]
pub use config::ConfigError;

// Derive macros (same names as the traits, separate namespace)
pub use dynbean_codegen::{Bean, BeanEnum};

/// dynbean version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
