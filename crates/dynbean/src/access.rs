// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property get/set bound to a descriptor.
//!
//! `set` tries, in order:
//!
//! 1. a setter overload (or writable field) that accepts the value's
//!    runtime type as is, exact match first;
//! 2. when the declared type is convertible, the coerced value through the
//!    primary setter or the writable field;
//! 3. with `force`, the backing field regardless of visibility or
//!    finality;
//! 4. nothing, returning `false`.
//!
//! Only faults raised by the accessor bodies themselves are errors.

use crate::convert::Coercer;
use crate::error::{BoxError, MappingError, Result};
use crate::introspect::{ArgumentMismatch, FieldDef, MethodBody, MethodDef, PropertyAccessor};
use crate::value::{ObjectRef, Value};
use std::any::Any;

/// Run a method body against `object` (ignored by static methods).
pub(crate) fn call_method(
    method: &MethodDef,
    object: &ObjectRef,
    args: Vec<Value>,
) -> std::result::Result<Value, BoxError> {
    match &method.body {
        MethodBody::Read(body) => {
            let guard = object.read();
            let instance: &dyn Any = &**guard;
            body(instance, args)
        }
        MethodBody::Write(body) => {
            // Converting a bean argument read-locks it, which may be `object`.
            let apply = body(args)?;
            let mut guard = object.write();
            let instance: &mut dyn Any = &mut **guard;
            apply(instance)
        }
        MethodBody::Static(body) => body(args),
    }
}

fn is_argument_mismatch(err: &BoxError) -> bool {
    err.downcast_ref::<ArgumentMismatch>().is_some()
}

impl PropertyAccessor {
    /// Current value: the getter, else a readable field (any field with
    /// `force`), else null.
    pub fn get(&self, object: &ObjectRef, force: bool) -> Result<Value> {
        if object.bean_type() != self.owner {
            return Ok(Value::Null);
        }
        if let Some(getter) = &self.getter {
            return call_method(getter, object, Vec::new())
                .map_err(|e| MappingError::invocation(self.owner.name(), getter.name(), e));
        }
        match &self.field {
            Some(field) if force || field.is_readable() => {
                let guard = object.read();
                let instance: &dyn Any = &**guard;
                Ok((field.get)(instance))
            }
            _ => Ok(Value::Null),
        }
    }

    /// Assign `value`. `Ok(false)` when no route accepts it.
    pub fn set(&self, object: &ObjectRef, value: Value, force: bool, coercer: &Coercer) -> Result<bool> {
        if object.bean_type() != self.owner {
            return Ok(false);
        }

        // 1. Assignable as is.
        let runtime = value.runtime_type();
        let direct = self
            .setters
            .exact(&runtime)
            .filter(|_| !value.is_null())
            .or_else(|| {
                self.setters
                    .overloads()
                    .iter()
                    .find(|s| coercer.accepts(&s.params[0], &value))
            });
        if let Some(setter) = direct {
            if self.invoke_setter(setter, object, value.clone())? {
                return Ok(true);
            }
        } else if let Some(field) = self.field.as_ref().filter(|f| f.is_writable()) {
            if coercer.accepts(&field.declared, &value) && write_field(field, object, value.clone()) {
                return Ok(true);
            }
        }

        // 2. Coerced into the declared type.
        let coerced = if coercer.is_convertible(&self.declared) {
            match coercer.converter().convert(&value, &self.declared) {
                Ok(coerced) => Some(coerced),
                Err(e) => {
                    log::debug!(
                        "[access] {}.{}: {}",
                        self.owner.short_name(),
                        self.name,
                        e
                    );
                    None
                }
            }
        } else {
            None
        };
        if let Some(coerced) = &coerced {
            if let Some(setter) = self.primary_setter() {
                if self.invoke_setter(setter, object, coerced.clone())? {
                    return Ok(true);
                }
            } else if let Some(field) = self.field.as_ref().filter(|f| f.is_writable()) {
                if write_field(field, object, coerced.clone()) {
                    return Ok(true);
                }
            }
        }

        // 3. Forced field write.
        if force {
            if let Some(field) = &self.field {
                return Ok(write_field(field, object, coerced.unwrap_or(value)));
            }
        }

        Ok(false)
    }

    /// `Ok(false)` when the body rejected the argument shape.
    fn invoke_setter(&self, setter: &MethodDef, object: &ObjectRef, value: Value) -> Result<bool> {
        match call_method(setter, object, vec![value]) {
            Ok(_) => Ok(true),
            Err(e) if is_argument_mismatch(&e) => Ok(false),
            Err(e) => Err(MappingError::invocation(self.owner.name(), setter.name(), e)),
        }
    }
}

fn write_field(field: &FieldDef, object: &ObjectRef, value: Value) -> bool {
    let Some(apply) = (field.set)(value) else {
        return false;
    };
    let mut guard = object.write();
    let instance: &mut dyn Any = &mut **guard;
    apply(instance)
}
