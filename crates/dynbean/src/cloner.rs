// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value duplication policy.
//!
//! Decides, per runtime value, how to copy it so the copy target does not
//! alias the caller's mutable state:
//!
//! 1. null stays null
//! 2. immutable values (text, numbers, enums) are returned as is
//! 3. lists, sets and maps are rebuilt element by element, same kind
//! 4. arrays are rebuilt element by element, same component type and length
//! 5. values of convertible type go through [`Converter::copy`](crate::Converter::copy)
//! 6. beans with a registered zero-argument `clone` method are cloned
//! 7. anything else is returned as is (aliased)
//!
//! Types found without a `clone` method are remembered, so step 6 is only
//! probed once per type. Containers are tracked by identity during one
//! duplication: shared sub-containers stay shared in the copy and cycles
//! are reproduced rather than followed forever.

use crate::access::call_method;
use crate::convert::Coercer;
use crate::error::{MappingError, Result};
use crate::introspect::DescriptorCache;
use crate::value::{ArrayRef, ListRef, MapRef, ObjectRef, SetRef, Value};
use dashmap::DashSet;
use std::any::TypeId;
use std::collections::HashMap;

/// Name of the duplication method probed in step 6.
pub const CLONE_METHOD: &str = "clone";

/// Duplication policy with a negative memo of non-cloneable types.
#[derive(Debug, Default)]
pub struct Cloner {
    not_cloneable: DashSet<TypeId>,
}

impl Cloner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicate `value` per the policy above.
    pub fn duplicate(
        &self,
        value: &Value,
        descriptors: &DescriptorCache,
        coercer: &Coercer,
    ) -> Result<Value> {
        let mut seen = HashMap::new();
        self.duplicate_in(value, descriptors, coercer, &mut seen)
    }

    /// Number of types remembered as not cloneable.
    pub fn negative_entries(&self) -> usize {
        self.not_cloneable.len()
    }

    fn duplicate_in(
        &self,
        value: &Value,
        descriptors: &DescriptorCache,
        coercer: &Coercer,
        seen: &mut HashMap<usize, Value>,
    ) -> Result<Value> {
        if value.is_null() || value.is_immutable() {
            return Ok(value.clone());
        }
        if let Some(copy) = value.identity().and_then(|id| seen.get(&id)) {
            return Ok(copy.clone());
        }

        match value {
            Value::List(list) => {
                let copy = ListRef::new(list.kind());
                seen.insert(list.addr(), Value::List(copy.clone()));
                for item in list.snapshot() {
                    copy.push(self.duplicate_in(&item, descriptors, coercer, seen)?);
                }
                Ok(Value::List(copy))
            }
            Value::Set(set) => {
                let copy = SetRef::new(set.kind());
                seen.insert(set.addr(), Value::Set(copy.clone()));
                for item in set.snapshot() {
                    copy.insert(self.duplicate_in(&item, descriptors, coercer, seen)?);
                }
                Ok(Value::Set(copy))
            }
            Value::Map(map) => {
                let copy = MapRef::new(map.kind());
                seen.insert(map.addr(), Value::Map(copy.clone()));
                for (key, item) in map.snapshot() {
                    let key = self.duplicate_in(&key, descriptors, coercer, seen)?;
                    copy.insert(key, self.duplicate_in(&item, descriptors, coercer, seen)?);
                }
                Ok(Value::Map(copy))
            }
            Value::Array(array) => {
                let copy = ArrayRef::new(array.component(), array.len());
                seen.insert(array.addr(), Value::Array(copy.clone()));
                for (index, item) in array.snapshot().iter().enumerate() {
                    copy.set(index, self.duplicate_in(item, descriptors, coercer, seen)?);
                }
                Ok(Value::Array(copy))
            }
            Value::Object(object) => {
                if coercer.is_convertible(&value.runtime_type()) {
                    return Ok(coercer.converter().copy(value));
                }
                let copy = self.clone_object(object, descriptors)?;
                if let Some(copy) = &copy {
                    seen.insert(object.addr(), copy.clone());
                }
                Ok(copy.unwrap_or_else(|| value.clone()))
            }
            other => Ok(other.clone()),
        }
    }

    /// Step 6. `Ok(None)` when the type has no usable `clone` method.
    fn clone_object(&self, object: &ObjectRef, descriptors: &DescriptorCache) -> Result<Option<Value>> {
        let bean_type = object.bean_type();
        if self.not_cloneable.contains(&bean_type.id()) {
            return Ok(None);
        }

        let descriptor = descriptors.get_or_build(bean_type);
        let method = descriptor
            .method_candidates(CLONE_METHOD, 0)
            .into_iter()
            .map(|index| &descriptor.methods()[index])
            .find(|m| !m.is_static());
        let Some(method) = method else {
            log::debug!(
                "[clone] {} has no clone method, aliasing from now on",
                bean_type.short_name()
            );
            self.not_cloneable.insert(bean_type.id());
            return Ok(None);
        };

        match call_method(method, object, Vec::new()) {
            Ok(copy @ Value::Object(_)) => Ok(Some(copy)),
            Ok(_) => Ok(None),
            Err(e) => Err(MappingError::invocation(bean_type.name(), CLONE_METHOD, e)),
        }
    }
}
