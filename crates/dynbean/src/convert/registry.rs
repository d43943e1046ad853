// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default converter.

use super::numeric::to_primitive;
use super::{Converter, ScalarConverter};
use crate::error::ConvertError;
use crate::value::{BeanEnum, BeanType, EnumValue, PrimitiveKind, Value, ValueType};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

/// Converter handling primitives, text, registered enums and registered
/// scalar object types.
///
/// Enums and scalar types can be registered at any time; lookups are
/// lock-free reads.
#[derive(Default)]
pub struct ConverterRegistry {
    enums: DashMap<Arc<str>, &'static [&'static str]>,
    scalars: DashMap<TypeId, Arc<dyn ScalarConverter>>,
}

impl ConverterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make text and ordinals convertible to `E`.
    pub fn register_enum<E: BeanEnum>(&self) {
        self.enums.insert(Arc::from(E::NAME), E::VARIANTS);
    }

    /// Builder form of [`ConverterRegistry::register_enum`].
    #[must_use]
    pub fn with_enum<E: BeanEnum>(self) -> Self {
        self.register_enum::<E>();
        self
    }

    /// Treat bean type `bean_type` as a scalar handled by `converter`.
    pub fn register_scalar(&self, bean_type: BeanType, converter: impl ScalarConverter + 'static) {
        log::debug!("[convert] scalar type {} registered", bean_type.short_name());
        self.scalars.insert(bean_type.id(), Arc::new(converter));
    }

    #[must_use]
    pub fn with_scalar(self, bean_type: BeanType, converter: impl ScalarConverter + 'static) -> Self {
        self.register_scalar(bean_type, converter);
        self
    }

    fn scalar(&self, bean_type: BeanType) -> Option<Arc<dyn ScalarConverter>> {
        self.scalars.get(&bean_type.id()).map(|s| Arc::clone(s.value()))
    }

    fn to_enum(&self, value: &Value, name: &Arc<str>) -> Result<Value, ConvertError> {
        let unknown = |input: String| ConvertError::UnknownVariant {
            enum_name: name.to_string(),
            input,
        };
        if let Value::Enum(e) = value {
            if e.type_name == *name {
                return Ok(value.clone());
            }
        }

        let Some(variants) = self.enums.get(name).map(|v| *v.value()) else {
            return Err(ConvertError::Unsupported {
                from: value.type_label(),
                to: format!("enum {}", name),
            });
        };

        let ordinal = match value {
            Value::Text(text) => {
                let text = text.trim();
                variants
                    .iter()
                    .position(|v| *v == text)
                    .or_else(|| variants.iter().position(|v| v.eq_ignore_ascii_case(text)))
                    .ok_or_else(|| unknown(text.to_string()))?
            }
            Value::Enum(e) => variants
                .iter()
                .position(|v| **v == *e.variant)
                .ok_or_else(|| unknown(e.variant.to_string()))?,
            other => match to_primitive(other, PrimitiveKind::U32)? {
                Value::U32(i) if (i as usize) < variants.len() => i as usize,
                _ => return Err(unknown(format!("{:?}", other))),
            },
        };
        Ok(Value::Enum(EnumValue::new(
            Arc::clone(name),
            variants[ordinal],
            ordinal as i64,
        )))
    }
}

impl Converter for ConverterRegistry {
    fn is_convertible(&self, target: &ValueType) -> bool {
        match target {
            ValueType::Primitive(_) | ValueType::Boxed(_) | ValueType::Text => true,
            ValueType::Enum(name) => self.enums.contains_key(name),
            ValueType::Object(bean_type) => self.scalars.contains_key(&bean_type.id()),
            _ => false,
        }
    }

    fn convert(&self, value: &Value, target: &ValueType) -> Result<Value, ConvertError> {
        if value.is_null() {
            return match target {
                ValueType::Primitive(kind) => Err(ConvertError::NullToPrimitive {
                    to: kind.name().to_string(),
                }),
                _ => Ok(Value::Null),
            };
        }
        match target {
            ValueType::Any => Ok(value.clone()),
            ValueType::Primitive(kind) | ValueType::Boxed(kind) => to_primitive(value, *kind),
            ValueType::Text => match value {
                Value::Text(_) => Ok(value.clone()),
                other => self
                    .convert_to_string(other)
                    .map(Value::text)
                    .ok_or_else(|| ConvertError::Unsupported {
                        from: other.type_label(),
                        to: "text".to_string(),
                    }),
            },
            ValueType::Enum(name) => self.to_enum(value, name),
            ValueType::Object(bean_type) => {
                if let Value::Object(object) = value {
                    if object.bean_type() == *bean_type {
                        return Ok(value.clone());
                    }
                }
                match self.scalar(*bean_type) {
                    Some(scalar) => scalar.convert(value),
                    None => Err(ConvertError::Unsupported {
                        from: value.type_label(),
                        to: target.to_string(),
                    }),
                }
            }
            other => Err(ConvertError::Unsupported {
                from: value.type_label(),
                to: other.to_string(),
            }),
        }
    }

    fn convert_to_string(&self, value: &Value) -> Option<String> {
        Some(match value {
            Value::Null => return None,
            Value::Bool(v) => v.to_string(),
            Value::Char(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Text(v) => v.to_string(),
            Value::Enum(e) => e.variant.to_string(),
            Value::Object(object) => return self.scalar(object.bean_type())?.to_text(value),
            Value::List(_) | Value::Set(_) | Value::Map(_) | Value::Array(_) => return None,
        })
    }

    fn copy(&self, value: &Value) -> Value {
        match value {
            Value::Object(object) => match self.scalar(object.bean_type()) {
                Some(scalar) => scalar.copy(value),
                None => value.clone(),
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectRef;
    use crate::{Bean, DescriptorBuilder};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Color {
        Red,
        Green,
    }

    impl BeanEnum for Color {
        const NAME: &'static str = "Color";
        const VARIANTS: &'static [&'static str] = &["Red", "Green"];

        fn ordinal(&self) -> usize {
            *self as usize
        }

        fn from_ordinal(ordinal: usize) -> Option<Self> {
            [Self::Red, Self::Green].get(ordinal).copied()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Millis(i64);

    impl Bean for Millis {
        fn describe(desc: DescriptorBuilder<Self>) -> DescriptorBuilder<Self> {
            desc
        }
    }

    struct MillisConverter;

    impl ScalarConverter for MillisConverter {
        fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
            match to_primitive(value, PrimitiveKind::I64)? {
                Value::I64(ms) => Ok(Value::Object(ObjectRef::new(Millis(ms)))),
                _ => unreachable!("i64 conversion yields i64"),
            }
        }

        fn to_text(&self, value: &Value) -> Option<String> {
            value.as_object()?.with(|m: &Millis| m.0.to_string())
        }

        fn copy(&self, value: &Value) -> Value {
            value
                .as_object()
                .and_then(ObjectRef::get::<Millis>)
                .map_or(Value::Null, |m| Value::Object(ObjectRef::new(m)))
        }
    }

    #[test]
    fn test_null_handling() {
        let conv = ConverterRegistry::new();
        let int = ValueType::Primitive(PrimitiveKind::I32);
        assert!(matches!(
            conv.convert(&Value::Null, &int),
            Err(ConvertError::NullToPrimitive { .. })
        ));
        assert!(conv.convert(&Value::Null, &int.boxed()).is_ok_and(|v| v.is_null()));
    }

    #[test]
    fn test_text_keeps_identity() {
        let conv = ConverterRegistry::new();
        let text = Value::text("same");
        let out = conv.convert(&text, &ValueType::Text).expect("text to text");
        assert!(out.same_instance(&text));
        assert_eq!(
            conv.convert(&Value::I32(12), &ValueType::Text).expect("number to text"),
            Value::text("12")
        );
    }

    #[test]
    fn test_enum_by_name_and_ordinal() {
        let conv = ConverterRegistry::new().with_enum::<Color>();
        let target = ValueType::Enum("Color".into());
        assert!(conv.is_convertible(&target));

        let by_name = conv.convert(&Value::text("green"), &target).expect("by name");
        assert_eq!(by_name.as_enum().map(|e| e.ordinal), Some(1));

        let by_ordinal = conv.convert(&Value::I32(0), &target).expect("by ordinal");
        assert_eq!(by_ordinal.as_enum().map(|e| &*e.variant), Some("Red"));

        assert!(matches!(
            conv.convert(&Value::text("Blue"), &target),
            Err(ConvertError::UnknownVariant { .. })
        ));
        assert!(conv.convert(&Value::I32(5), &target).is_err());
    }

    #[test]
    fn test_unregistered_enum_not_convertible() {
        let conv = ConverterRegistry::new();
        assert!(!conv.is_convertible(&ValueType::Enum("Color".into())));
    }

    #[test]
    fn test_scalar_plugin() {
        let millis = BeanType::of::<Millis>();
        let conv = ConverterRegistry::new().with_scalar(millis, MillisConverter);
        let target = ValueType::Object(millis);
        assert!(conv.is_convertible(&target));

        let converted = conv.convert(&Value::text("1500"), &target).expect("scalar");
        assert_eq!(conv.convert_to_string(&converted).as_deref(), Some("1500"));

        let copied = conv.copy(&converted);
        assert!(!copied.same_instance(&converted));
        assert_eq!(copied.as_object().and_then(ObjectRef::get::<Millis>), Some(Millis(1500)));
    }

    #[test]
    fn test_containers_not_convertible() {
        let conv = ConverterRegistry::new();
        assert!(!conv.is_convertible(&ValueType::list_of(ValueType::Text)));
        assert!(!conv.is_convertible(&ValueType::Any));
        assert_eq!(conv.convert_to_string(&Value::list(Vec::new())), None);
    }
}
