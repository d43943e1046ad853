// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Whole-object property copy.
//!
//! The source is either a map (its entries are the properties) or a bean
//! (its readable properties). Each `(name, value)` is matched to a target
//! property by exact name, or through the alias table when copying
//! case-insensitively, then:
//!
//! - null is assigned unless the target is primitive,
//! - a container is rebuilt into the target's declared container kind,
//!   each element coerced to the declared element type or, for bean
//!   elements, instantiated and copied recursively,
//! - a map or foreign bean offered to a bean-typed property is copied into
//!   a fresh instance of that type (`map_nested`),
//! - anything else is duplicated by the [`Cloner`] and assigned.
//!
//! Mismatches are skipped and recorded in the [`CopyReport`]. A
//! [`PathGuard`](guard::PathGuard) tracks the containers and beans on the
//! current path, so cycles are skipped or reported and nesting is bounded.

mod guard;
mod report;

pub use report::{CopyReport, SkipReason, Skipped};

use crate::cloner::Cloner;
use crate::config::CopyOptions;
use crate::convert::Coercer;
use crate::error::{MappingError, Result};
use crate::introspect::{DescriptorCache, PropertyAccessor};
use crate::value::{ArrayRef, BeanType, ListRef, MapRef, ObjectRef, SetRef, Value, ValueType};
use guard::{Enter, PathGuard};

/// Create an instance of `bean_type` through its registered constructor.
pub(crate) fn instantiate(descriptors: &DescriptorCache, bean_type: BeanType) -> Result<ObjectRef> {
    let descriptor = descriptors.get_or_build(bean_type);
    let constructor = descriptor.constructor().ok_or_else(|| {
        MappingError::instantiation(bean_type.name(), "no constructor registered")
    })?;
    Ok(ObjectRef::from_boxed(bean_type, constructor()))
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn mismatch(expected: &ValueType, got: &Value) -> SkipReason {
    SkipReason::TypeMismatch {
        expected: expected.to_string(),
        got: got.type_label(),
    }
}

/// One copy operation: options, path guard and report.
pub struct GraphCopier<'a> {
    descriptors: &'a DescriptorCache,
    coercer: &'a Coercer,
    cloner: &'a Cloner,
    options: CopyOptions,
    guard: PathGuard,
    report: CopyReport,
}

impl<'a> GraphCopier<'a> {
    pub fn new(
        descriptors: &'a DescriptorCache,
        coercer: &'a Coercer,
        cloner: &'a Cloner,
        options: CopyOptions,
    ) -> Self {
        Self {
            descriptors,
            coercer,
            cloner,
            options,
            guard: PathGuard::new(options.max_depth, options.on_cycle),
            report: CopyReport::default(),
        }
    }

    /// Copy the properties of `from` into the bean or map `to`.
    pub fn copy(&mut self, from: &Value, to: &Value) -> Result<()> {
        match to {
            Value::Object(target) => self.copy_into_object(from, target, "").map(|_| ()),
            Value::Map(target) => self.copy_into_map(from, target),
            other => Err(MappingError::NotABean {
                got: other.type_label(),
            }),
        }
    }

    /// Build a value of type `target` from `from`: a bean is instantiated
    /// and copied into, a container is rebuilt, a bean offered to a map
    /// type becomes a map of its readable properties, a scalar is coerced.
    pub fn convert(&mut self, from: &Value, target: &ValueType) -> Result<Value> {
        let failed = |reason: String| MappingError::instantiation(target.to_string(), reason);
        match target {
            ValueType::Object(bean_type) if !self.coercer.is_convertible(target) => {
                let object = instantiate(self.descriptors, *bean_type)?;
                self.copy_into_object(from, &object, "")?;
                Ok(Value::Object(object))
            }
            ValueType::Map { kind, key, value } if matches!(from, Value::Object(_)) => {
                let map = MapRef::new(kind.concrete());
                self.properties_into_map(from, &map, key, value)?;
                Ok(Value::Map(map))
            }
            t if t.is_container() => {
                if !from.is_container_value() {
                    return Err(failed(format!("cannot build from {}", from.type_label())));
                }
                self.rebuild(from, t, "")?
                    .ok_or_else(|| failed(format!("cannot build from {}", from.type_label())))
            }
            t => self.coercer.coerce(from, t).map_err(|e| MappingError::Instantiation {
                type_name: t.to_string(),
                reason: e.to_string(),
                source: Some(Box::new(e)),
            }),
        }
    }

    /// Consume the copier, returning what it did.
    pub fn finish(self) -> CopyReport {
        self.report
    }

    fn source_entries(&self, from: &Value) -> Result<Vec<(String, Value)>> {
        match from {
            Value::Null => Ok(Vec::new()),
            Value::Map(map) => Ok(map
                .snapshot()
                .into_iter()
                .filter_map(|(key, value)| {
                    let name = match &key {
                        Value::Text(text) => Some(text.to_string()),
                        other => self.coercer.converter().convert_to_string(other),
                    };
                    name.map(|name| (name, value))
                })
                .collect()),
            Value::Object(source) => {
                let descriptor = self.descriptors.get_or_build(source.bean_type());
                let mut entries = Vec::with_capacity(descriptor.properties().len());
                for property in descriptor.properties().iter().filter(|p| p.is_readable()) {
                    entries.push((property.name().to_string(), property.get(source, false)?));
                }
                Ok(entries)
            }
            other => Err(MappingError::NotABean {
                got: other.type_label(),
            }),
        }
    }

    /// `Ok(false)` when `from` was skipped as a cycle.
    fn copy_into_object(&mut self, from: &Value, target: &ObjectRef, path: &str) -> Result<bool> {
        if let Value::Object(source) = from {
            if source.ptr_eq(target) {
                return Ok(true);
            }
        }
        if self.guard.enter(from.identity(), path)? == Enter::Cycle {
            self.report.skip(path.to_string(), SkipReason::Cycle);
            return Ok(false);
        }
        let result = self.copy_entries(from, target, path);
        self.guard.leave();
        result.map(|_| true)
    }

    fn copy_entries(&mut self, from: &Value, target: &ObjectRef, path: &str) -> Result<()> {
        let entries = self.source_entries(from)?;
        let descriptor = self.descriptors.get_or_build(target.bean_type());

        for (name, value) in entries {
            let child = join(path, &name);
            let property = if self.options.case_insensitive {
                descriptor.property_ci(&name)
            } else {
                descriptor.property(&name)
            };
            let Some(property) = property else {
                self.report.skip(child, SkipReason::NoTarget);
                continue;
            };
            if !property.is_writable() {
                self.report.skip(child, SkipReason::NotWritable);
                continue;
            }
            self.copy_property(property, target, value, child)?;
        }
        Ok(())
    }

    fn copy_into_map(&mut self, from: &Value, target: &MapRef) -> Result<()> {
        if let Value::Map(source) = from {
            if source.ptr_eq(target) {
                return Ok(());
            }
        }
        if self.guard.enter(from.identity(), "")? == Enter::Cycle {
            return Ok(());
        }
        let result = self.source_entries(from).and_then(|entries| {
            for (name, value) in entries {
                let copy = self.cloner.duplicate(&value, self.descriptors, self.coercer)?;
                target.insert(Value::text(name.as_str()), copy);
                self.report.copied(name);
            }
            Ok(())
        });
        self.guard.leave();
        result
    }

    /// Readable properties of `from` as entries of `target`, keys and
    /// values coerced like map elements.
    fn properties_into_map(
        &mut self,
        from: &Value,
        target: &MapRef,
        key_type: &ValueType,
        value_type: &ValueType,
    ) -> Result<()> {
        if self.guard.enter(from.identity(), "")? == Enter::Cycle {
            return Ok(());
        }
        let result = self.source_entries(from).and_then(|entries| {
            for (name, value) in entries {
                let Some(key) = self.element(&Value::text(name.as_str()), key_type, &name)? else {
                    continue;
                };
                if let Some(value) = self.element(&value, value_type, &name)? {
                    target.insert(key, value);
                    self.report.copied(name);
                }
            }
            Ok(())
        });
        self.guard.leave();
        result
    }

    fn copy_property(
        &mut self,
        property: &PropertyAccessor,
        target: &ObjectRef,
        value: Value,
        path: String,
    ) -> Result<()> {
        let declared = property.declared();

        let assigned = if value.is_null() {
            if !declared.is_nullable() {
                self.report.skip(path, SkipReason::NullToPrimitive);
                return Ok(());
            }
            Some(Value::Null)
        } else if declared.is_container() && value.is_container_value() {
            self.rebuild(&value, declared, &path)?
        } else if self.nests_into(&value, declared) {
            let bean_type = declared.bean_type().ok_or_else(|| MappingError::NotABean {
                got: declared.to_string(),
            })?;
            self.nested(&value, bean_type, &path)?
        } else {
            Some(self.cloner.duplicate(&value, self.descriptors, self.coercer)?)
        };

        let Some(assigned) = assigned else {
            return Ok(());
        };
        let got = assigned.clone();
        if property.set(target, assigned, false, self.coercer)? {
            self.report.copied(path);
        } else {
            self.report.skip(path, mismatch(declared, &got));
        }
        Ok(())
    }

    /// Should `value` be copied into a fresh instance of the declared bean
    /// type rather than assigned?
    fn nests_into(&self, value: &Value, declared: &ValueType) -> bool {
        let Some(bean_type) = declared.bean_type() else {
            return false;
        };
        if !self.options.map_nested || self.coercer.is_convertible(declared) {
            return false;
        }
        match value {
            Value::Map(_) => true,
            Value::Object(object) => object.bean_type() != bean_type,
            _ => false,
        }
    }

    fn nested(&mut self, value: &Value, bean_type: BeanType, path: &str) -> Result<Option<Value>> {
        let object = instantiate(self.descriptors, bean_type)?;
        if self.copy_into_object(value, &object, path)? {
            Ok(Some(Value::Object(object)))
        } else {
            Ok(None)
        }
    }

    /// Rebuild container `value` as `declared`. `None` when skipped.
    fn rebuild(&mut self, value: &Value, declared: &ValueType, path: &str) -> Result<Option<Value>> {
        if self.guard.enter(value.identity(), path)? == Enter::Cycle {
            self.report.skip(path.to_string(), SkipReason::Cycle);
            return Ok(None);
        }
        let result = self.rebuild_entered(value, declared, path);
        self.guard.leave();
        result
    }

    fn rebuild_entered(&mut self, value: &Value, declared: &ValueType, path: &str) -> Result<Option<Value>> {
        let items = value.elements();
        match (declared, items) {
            (ValueType::List { kind, element }, Some(items)) => {
                let list = ListRef::new(kind.concrete());
                for (index, item) in items.iter().enumerate() {
                    if let Some(v) = self.element(item, element, &format!("{}[{}]", path, index))? {
                        list.push(v);
                    }
                }
                Ok(Some(Value::List(list)))
            }
            (ValueType::Set { kind, element }, Some(items)) => {
                let set = SetRef::new(kind.concrete());
                for (index, item) in items.iter().enumerate() {
                    if let Some(v) = self.element(item, element, &format!("{}[{}]", path, index))? {
                        set.insert(v);
                    }
                }
                Ok(Some(Value::Set(set)))
            }
            (ValueType::Array(component), Some(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let v = self.element(item, component, &format!("{}[{}]", path, index))?;
                    out.push(v.unwrap_or(Value::Null));
                }
                Ok(Some(Value::Array(ArrayRef::from_vec((**component).clone(), out))))
            }
            (ValueType::Map { kind, key, value: item_type }, None) => {
                let Value::Map(source) = value else {
                    self.report.skip(path.to_string(), mismatch(declared, value));
                    return Ok(None);
                };
                let map = MapRef::new(kind.concrete());
                for (k, v) in source.snapshot() {
                    let label = self
                        .coercer
                        .converter()
                        .convert_to_string(&k)
                        .unwrap_or_else(|| k.type_label());
                    let child = join(path, &label);
                    let Some(k) = self.element(&k, key, &child)? else {
                        continue;
                    };
                    if let Some(v) = self.element(&v, item_type, &child)? {
                        map.insert(k, v);
                    }
                }
                Ok(Some(Value::Map(map)))
            }
            _ => {
                self.report.skip(path.to_string(), mismatch(declared, value));
                Ok(None)
            }
        }
    }

    /// One container element coerced to `declared`. `None` when skipped.
    fn element(&mut self, item: &Value, declared: &ValueType, path: &str) -> Result<Option<Value>> {
        if item.is_null() {
            return Ok(Some(Value::Null));
        }
        match declared {
            ValueType::Any => Ok(Some(self.cloner.duplicate(item, self.descriptors, self.coercer)?)),
            t if self.coercer.is_convertible(t) => match self.coercer.coerce(item, t) {
                Ok(v) => Ok(Some(v)),
                Err(_) => {
                    self.report.skip(path.to_string(), mismatch(t, item));
                    Ok(None)
                }
            },
            t if t.is_container() && item.is_container_value() => self.rebuild(item, t, path),
            ValueType::Object(bean_type)
                if self.options.map_nested && matches!(item, Value::Map(_) | Value::Object(_)) =>
            {
                self.nested(item, *bean_type, path)
            }
            t if self.coercer.accepts(t, item) => {
                Ok(Some(self.cloner.duplicate(item, self.descriptors, self.coercer)?))
            }
            t => {
                self.report.skip(path.to_string(), mismatch(t, item));
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests;
