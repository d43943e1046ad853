// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The engine façade.
//!
//! A [`Registry`] owns every cache the engine keeps: descriptors, method
//! candidates and winners, assignability answers and the negative clone
//! memo. It is an ordinary value; share it with `Arc` when several threads
//! map concurrently. All operations take `&self`.
//!
//! # Usage Pattern
//!
//! ```ignore
//! let registry = Registry::builder()
//!     .cache(CachePolicy::bounded_default())
//!     .copy_options(CopyOptions::case_insensitive())
//!     .build();
//!
//! registry.copy_properties(&row, &user, true)?;
//! let name = registry.get_value(&user, "userName")?;
//! registry.invoke(&user, "rename", vec![Value::text("ada")])?;
//! ```

use crate::cloner::Cloner;
use crate::config::{CachePolicy, CopyOptions, RegistryConfig};
use crate::convert::{Coercer, Converter, ConverterRegistry};
use crate::copier::{instantiate, CopyReport, GraphCopier};
use crate::dispatch::MethodDispatcher;
use crate::error::{MappingError, Result};
use crate::introspect::naming::normalize;
use crate::introspect::{Bean, DescriptorCache, LookupStats, TypeDescriptor};
use crate::value::{BeanType, ListRef, MapRef, ObjectRef, SetRef, Value, ValueType};
use arc_swap::ArcSwap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Owned mapping engine.
pub struct Registry {
    descriptors: DescriptorCache,
    coercer: Coercer,
    cloner: Cloner,
    dispatcher: MethodDispatcher,
    /// Options used by [`Registry::copy_properties`]; swappable at runtime.
    copy_defaults: ArcSwap<CopyOptions>,
}

impl Registry {
    /// Unbounded caches, default converter, default copy options.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::builder().config(config).build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    // ===================================================================
    // Introspection
    // ===================================================================

    /// Descriptor of `bean_type`, built on first use.
    ///
    /// Repeated calls return the same instance while the type stays cached
    /// (always, with an unbounded cache).
    pub fn describe(&self, bean_type: BeanType) -> Arc<TypeDescriptor> {
        self.descriptors.get_or_build(bean_type)
    }

    pub fn describe_of<T: Bean>(&self) -> Arc<TypeDescriptor> {
        self.describe(BeanType::of::<T>())
    }

    /// Keep `bean_type` in a bounded cache forever.
    pub fn pin(&self, bean_type: BeanType) {
        self.descriptors.pin(bean_type);
    }

    // ===================================================================
    // Property access
    // ===================================================================

    /// Property `name` of a bean, or entry `name` of a map. Null when absent.
    pub fn get_value(&self, target: &Value, name: &str) -> Result<Value> {
        self.get(target, name, false)
    }

    /// [`Registry::get_value`] matching `name` case- and
    /// underscore-insensitively.
    pub fn get_value_ci(&self, target: &Value, name: &str) -> Result<Value> {
        self.get(target, name, true)
    }

    /// Assign property `name`. `Ok(false)` when the property is absent or
    /// rejects the value; errors only for faults raised by the accessor.
    /// `force` writes the backing field bypassing visibility and finality.
    pub fn set_value(&self, target: &Value, name: &str, value: Value, force: bool) -> Result<bool> {
        self.set(target, name, value, force, false)
    }

    pub fn set_value_ci(&self, target: &Value, name: &str, value: Value, force: bool) -> Result<bool> {
        self.set(target, name, value, force, true)
    }

    fn get(&self, target: &Value, name: &str, ci: bool) -> Result<Value> {
        match target {
            Value::Object(object) => {
                let descriptor = self.describe(object.bean_type());
                let property = if ci {
                    descriptor.property_ci(name)
                } else {
                    descriptor.property(name)
                };
                match property {
                    Some(property) => property.get(object, false),
                    None => Ok(Value::Null),
                }
            }
            Value::Map(map) => {
                let key = if ci { map_key_ci(map, name) } else { None };
                Ok(key
                    .and_then(|k| map.get(&k))
                    .or_else(|| map.get_str(name))
                    .unwrap_or(Value::Null))
            }
            other => Err(MappingError::NotABean {
                got: other.type_label(),
            }),
        }
    }

    fn set(&self, target: &Value, name: &str, value: Value, force: bool, ci: bool) -> Result<bool> {
        match target {
            Value::Object(object) => {
                let descriptor = self.describe(object.bean_type());
                let property = if ci {
                    descriptor.property_ci(name)
                } else {
                    descriptor.property(name)
                };
                match property {
                    Some(property) => property.set(object, value, force, &self.coercer),
                    None => Ok(false),
                }
            }
            Value::Map(map) => {
                let key = ci
                    .then(|| map_key_ci(map, name))
                    .flatten()
                    .unwrap_or_else(|| Value::text(name));
                map.insert(key, value);
                Ok(true)
            }
            other => Err(MappingError::NotABean {
                got: other.type_label(),
            }),
        }
    }

    // ===================================================================
    // Graph copy and conversion
    // ===================================================================

    /// Best-effort copy of every property of `from` (bean or map) into
    /// `to` (bean or map), with the default copy options.
    pub fn copy_properties(&self, from: &Value, to: &Value, case_insensitive: bool) -> Result<()> {
        let options = CopyOptions {
            case_insensitive,
            ..self.copy_defaults()
        };
        self.copy_properties_with(from, to, options)
    }

    pub fn copy_properties_with(&self, from: &Value, to: &Value, options: CopyOptions) -> Result<()> {
        self.copy_properties_report(from, to, options).map(|_| ())
    }

    /// Copy and report which properties were copied and which were skipped.
    pub fn copy_properties_report(
        &self,
        from: &Value,
        to: &Value,
        options: CopyOptions,
    ) -> Result<CopyReport> {
        let mut copier = self.copier(options);
        copier.copy(from, to)?;
        Ok(copier.finish())
    }

    /// Build a `target` value from `from`: beans are instantiated and
    /// copied into, containers rebuilt (a bean into a map of its
    /// properties), scalars coerced.
    pub fn convert(&self, from: &Value, target: &ValueType) -> Result<Value> {
        self.copier(self.copy_defaults()).convert(from, target)
    }

    /// Convert into a new instance of bean `T`.
    pub fn convert_to<T: Bean>(&self, from: &Value) -> Result<ObjectRef> {
        match self.convert(from, &ValueType::Object(BeanType::of::<T>()))? {
            Value::Object(object) => Ok(object),
            other => Err(MappingError::NotABean {
                got: other.type_label(),
            }),
        }
    }

    /// Convert every element of a list, set or array.
    pub fn convert_list(&self, from: &Value, element: ValueType) -> Result<ListRef> {
        match self.convert(from, &ValueType::list_of(element))? {
            Value::List(list) => Ok(list),
            other => Err(not_built("list", &other)),
        }
    }

    pub fn convert_set(&self, from: &Value, element: ValueType) -> Result<SetRef> {
        match self.convert(from, &ValueType::set_of(element))? {
            Value::Set(set) => Ok(set),
            other => Err(not_built("set", &other)),
        }
    }

    /// Convert every value of a map; keys are kept as text.
    pub fn convert_map(&self, from: &Value, value: ValueType) -> Result<MapRef> {
        match self.convert(from, &ValueType::map_of(ValueType::Text, value))? {
            Value::Map(map) => Ok(map),
            other => Err(not_built("map", &other)),
        }
    }

    /// New instance of `bean_type` through its registered constructor.
    pub fn instantiate(&self, bean_type: BeanType) -> Result<ObjectRef> {
        instantiate(&self.descriptors, bean_type)
    }

    /// Duplicate `value` so that the copy shares no mutable state with it.
    pub fn duplicate(&self, value: &Value) -> Result<Value> {
        self.cloner.duplicate(value, &self.descriptors, &self.coercer)
    }

    fn copier(&self, options: CopyOptions) -> GraphCopier<'_> {
        GraphCopier::new(&self.descriptors, &self.coercer, &self.cloner, options)
    }

    // ===================================================================
    // Invocation
    // ===================================================================

    /// Invoke method `name` on a bean.
    pub fn invoke(&self, target: &Value, name: &str, args: Vec<Value>) -> Result<Value> {
        let Value::Object(object) = target else {
            return Err(MappingError::NotABean {
                got: target.type_label(),
            });
        };
        let descriptor = self.describe(object.bean_type());
        self.dispatcher
            .invoke(&descriptor, object, name, args, &self.coercer)
    }

    // ===================================================================
    // Configuration and statistics
    // ===================================================================

    pub fn converter(&self) -> &dyn Converter {
        self.coercer.converter()
    }

    /// Current default copy options.
    #[inline]
    #[must_use]
    pub fn copy_defaults(&self) -> CopyOptions {
        **self.copy_defaults.load()
    }

    /// Replace the default copy options (atomic swap, no lock).
    #[inline]
    pub fn set_copy_defaults(&self, options: CopyOptions) {
        self.copy_defaults.store(Arc::new(options));
    }

    /// Descriptor cache statistics.
    #[must_use]
    pub fn stats(&self) -> LookupStats {
        self.descriptors.stats()
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Existing key of `map` equal to `name` up to case and underscores.
fn map_key_ci(map: &MapRef, name: &str) -> Option<Value> {
    let wanted = normalize(name);
    map.snapshot()
        .into_iter()
        .map(|(key, _)| key)
        .find(|key| key.as_str().is_some_and(|k| normalize(k) == wanted))
}

fn not_built(kind: &str, got: &Value) -> MappingError {
    MappingError::instantiation(kind, format!("conversion produced {}", got.type_label()))
}

/// [`Registry`] construction.
#[derive(Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    converter: Option<Arc<dyn Converter>>,
    pinned: Vec<BeanType>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn cache(mut self, policy: CachePolicy) -> Self {
        self.config.cache = policy;
        self
    }

    /// Bounded LRU descriptor cache.
    #[must_use]
    pub fn bounded(self, capacity: NonZeroUsize) -> Self {
        self.cache(CachePolicy::Bounded { capacity })
    }

    /// Replace the default [`ConverterRegistry`].
    #[must_use]
    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    #[must_use]
    pub fn shared_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    #[must_use]
    pub fn copy_options(mut self, options: CopyOptions) -> Self {
        self.config.copy = options;
        self
    }

    /// Never evict `bean_type` from a bounded cache.
    #[must_use]
    pub fn pin(mut self, bean_type: BeanType) -> Self {
        self.pinned.push(bean_type);
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        let converter = self
            .converter
            .unwrap_or_else(|| Arc::new(ConverterRegistry::new()));
        let descriptors = DescriptorCache::new(self.config.cache);
        for bean_type in self.pinned {
            descriptors.pin(bean_type);
        }
        log::debug!(
            "[registry] created: cache={:?} copy={:?}",
            self.config.cache,
            self.config.copy
        );
        Registry {
            descriptors,
            coercer: Coercer::new(converter),
            cloner: Cloner::new(),
            dispatcher: MethodDispatcher::new(),
            copy_defaults: ArcSwap::from_pointee(self.config.copy),
        }
    }
}
