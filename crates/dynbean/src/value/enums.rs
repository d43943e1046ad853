// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fieldless enums as dynamic values.

use crate::value::{EnumValue, Value};

/// A fieldless enum with a fixed, ordered variant table.
///
/// Registering an enum with a converter makes text and ordinals convertible
/// to it. `#[derive(BeanEnum)]` implements this together with the value
/// bridges.
pub trait BeanEnum: Sized + Send + Sync + 'static {
    /// Enum name as reported by [`ValueType::Enum`](crate::ValueType::Enum).
    const NAME: &'static str;
    /// Variant names in declaration order.
    const VARIANTS: &'static [&'static str];

    fn ordinal(&self) -> usize;

    fn from_ordinal(ordinal: usize) -> Option<Self>;

    fn variant(&self) -> &'static str {
        Self::VARIANTS.get(self.ordinal()).copied().unwrap_or("")
    }

    fn to_enum_value(&self) -> EnumValue {
        EnumValue::new(Self::NAME, self.variant(), self.ordinal() as i64)
    }

    /// Decode a `Value::Enum` of this enum.
    fn from_enum_value(value: &Value) -> Option<Self> {
        let Value::Enum(e) = value else {
            return None;
        };
        if &*e.type_name != Self::NAME {
            return None;
        }
        Self::VARIANTS
            .iter()
            .position(|v| *v == &*e.variant)
            .and_then(Self::from_ordinal)
    }
}

/// Implement [`Typed`](crate::Typed), [`IntoValue`](crate::IntoValue) and
/// [`FromValue`](crate::FromValue) for a hand-written [`BeanEnum`].
#[macro_export]
macro_rules! impl_enum_value {
    ($ty:ty) => {
        impl $crate::Typed for $ty {
            fn value_type() -> $crate::ValueType {
                $crate::ValueType::Enum(<$ty as $crate::BeanEnum>::NAME.into())
            }
        }

        impl $crate::IntoValue for $ty {
            fn into_value(self) -> $crate::Value {
                $crate::Value::Enum($crate::BeanEnum::to_enum_value(&self))
            }
        }

        impl $crate::FromValue for $ty {
            fn from_value(value: $crate::Value) -> Option<Self> {
                <$ty as $crate::BeanEnum>::from_enum_value(&value)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FromValue, IntoValue, Typed, ValueType};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Level {
        Low,
        High,
    }

    impl BeanEnum for Level {
        const NAME: &'static str = "Level";
        const VARIANTS: &'static [&'static str] = &["Low", "High"];

        fn ordinal(&self) -> usize {
            *self as usize
        }

        fn from_ordinal(ordinal: usize) -> Option<Self> {
            match ordinal {
                0 => Some(Self::Low),
                1 => Some(Self::High),
                _ => None,
            }
        }
    }

    crate::impl_enum_value!(Level);

    #[test]
    fn test_enum_bridge() {
        assert_eq!(Level::value_type(), ValueType::Enum("Level".into()));

        let value = Level::High.into_value();
        let e = value.as_enum().expect("enum value");
        assert_eq!(&*e.variant, "High");
        assert_eq!(e.ordinal, 1);
        assert_eq!(Level::from_value(value), Some(Level::High));
    }

    #[test]
    fn test_foreign_enum_rejected() {
        let other = Value::Enum(EnumValue::new("Other", "High", 1));
        assert_eq!(Level::from_value(other), None);
        assert_eq!(Level::from_value(Value::text("High")), None);
    }
}
