// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar type coercion.
//!
//! [`Converter`] is the pluggable coercion service every component consults:
//! the property accessor before falling back to a coerced assignment, the
//! cloner for convertible values, the graph copier for container elements
//! and the dispatcher for its second resolution pass.
//! [`ConverterRegistry`] is the default implementation.

mod numeric;
mod registry;

pub use registry::ConverterRegistry;

use crate::error::ConvertError;
use crate::util::AssignabilityCache;
use crate::value::{Value, ValueType};
use std::sync::Arc;

/// Scalar coercion service.
pub trait Converter: Send + Sync {
    /// Is `target` a scalar type this converter can produce?
    fn is_convertible(&self, target: &ValueType) -> bool;

    /// Coerce `value` to `target`.
    fn convert(&self, value: &Value, target: &ValueType) -> Result<Value, ConvertError>;

    /// Text rendering of a scalar; `None` for null and non-scalars.
    fn convert_to_string(&self, value: &Value) -> Option<String>;

    /// Independent copy of a convertible value.
    fn copy(&self, value: &Value) -> Value;
}

/// Conversion plugin for a bean type used as a scalar (timestamps,
/// decimals, identifiers).
pub trait ScalarConverter: Send + Sync {
    /// Build the scalar from any value.
    fn convert(&self, value: &Value) -> Result<Value, ConvertError>;

    fn to_text(&self, _value: &Value) -> Option<String> {
        None
    }

    /// Independent copy; aliasing by default.
    fn copy(&self, value: &Value) -> Value {
        value.clone()
    }
}

/// Converter plus memoized assignability, shared by the engine components.
pub struct Coercer {
    converter: Arc<dyn Converter>,
    assignable: AssignabilityCache,
}

impl Coercer {
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self {
            converter,
            assignable: AssignabilityCache::new(),
        }
    }

    pub fn converter(&self) -> &dyn Converter {
        self.converter.as_ref()
    }

    /// Can `value` be stored in a `declared` slot without coercion?
    pub fn accepts(&self, declared: &ValueType, value: &Value) -> bool {
        if value.is_null() {
            return declared.is_nullable();
        }
        self.assignable
            .check(declared, &value.runtime_type(), ValueType::accepts)
    }

    pub fn is_convertible(&self, target: &ValueType) -> bool {
        self.converter.is_convertible(target)
    }

    /// `value` as is when assignable, else coerced when `declared` is
    /// convertible.
    pub fn coerce(&self, value: &Value, declared: &ValueType) -> Result<Value, ConvertError> {
        if self.accepts(declared, value) {
            return Ok(value.clone());
        }
        if !self.is_convertible(declared) {
            return Err(ConvertError::Unsupported {
                from: value.type_label(),
                to: declared.to_string(),
            });
        }
        self.converter.convert(value, declared)
    }

    /// Number of memoized assignability answers.
    pub fn assignability_entries(&self) -> usize {
        self.assignable.len()
    }
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new(Arc::new(ConverterRegistry::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveKind;

    #[test]
    fn test_accepts_memoizes_pairs() {
        let coercer = Coercer::default();
        let int = ValueType::Primitive(PrimitiveKind::I32);

        assert!(coercer.accepts(&int, &Value::I32(1)));
        assert!(coercer.accepts(&int, &Value::I32(2)));
        assert!(!coercer.accepts(&int, &Value::text("1")));
        assert_eq!(coercer.assignability_entries(), 2);
    }

    #[test]
    fn test_null_only_into_nullable() {
        let coercer = Coercer::default();
        assert!(!coercer.accepts(&ValueType::Primitive(PrimitiveKind::I32), &Value::Null));
        assert!(coercer.accepts(&ValueType::Boxed(PrimitiveKind::I32), &Value::Null));
        assert!(coercer.accepts(&ValueType::Text, &Value::Null));
        assert_eq!(coercer.assignability_entries(), 0);
    }

    #[test]
    fn test_coerce() {
        let coercer = Coercer::default();
        let long = ValueType::Primitive(PrimitiveKind::I64);
        assert_eq!(coercer.coerce(&Value::text("9"), &long), Ok(Value::I64(9)));
        assert!(coercer
            .coerce(&Value::I32(1), &ValueType::list_of(ValueType::Any))
            .is_err());
    }
}
