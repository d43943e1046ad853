// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive coercion: numeric widening/narrowing with range checks, text
//! parsing, bool and char.

use crate::error::ConvertError;
use crate::value::{PrimitiveKind, Value};

enum Number {
    Int(i128),
    Float(f64),
}

fn number(value: &Value) -> Option<Number> {
    Some(match value {
        Value::I8(v) => Number::Int(i128::from(*v)),
        Value::I16(v) => Number::Int(i128::from(*v)),
        Value::I32(v) => Number::Int(i128::from(*v)),
        Value::I64(v) => Number::Int(i128::from(*v)),
        Value::U8(v) => Number::Int(i128::from(*v)),
        Value::U16(v) => Number::Int(i128::from(*v)),
        Value::U32(v) => Number::Int(i128::from(*v)),
        Value::U64(v) => Number::Int(i128::from(*v)),
        Value::F32(v) => Number::Float(f64::from(*v)),
        Value::F64(v) => Number::Float(*v),
        Value::Char(c) => Number::Int(i128::from(u32::from(*c))),
        Value::Enum(e) => Number::Int(i128::from(e.ordinal)),
        _ => return None,
    })
}

fn int_bounds(kind: PrimitiveKind) -> (i128, i128) {
    match kind {
        PrimitiveKind::I8 => (i8::MIN.into(), i8::MAX.into()),
        PrimitiveKind::I16 => (i16::MIN.into(), i16::MAX.into()),
        PrimitiveKind::I32 => (i32::MIN.into(), i32::MAX.into()),
        PrimitiveKind::I64 => (i64::MIN.into(), i64::MAX.into()),
        PrimitiveKind::U8 => (0, u8::MAX.into()),
        PrimitiveKind::U16 => (0, u16::MAX.into()),
        PrimitiveKind::U32 => (0, u32::MAX.into()),
        PrimitiveKind::U64 => (0, u64::MAX.into()),
        _ => (0, 0),
    }
}

/// Build an integer value of `kind`. `v` must be within `int_bounds(kind)`.
fn make_int(kind: PrimitiveKind, v: i128) -> Value {
    match kind {
        PrimitiveKind::I8 => Value::I8(v as i8),
        PrimitiveKind::I16 => Value::I16(v as i16),
        PrimitiveKind::I32 => Value::I32(v as i32),
        PrimitiveKind::I64 => Value::I64(v as i64),
        PrimitiveKind::U8 => Value::U8(v as u8),
        PrimitiveKind::U16 => Value::U16(v as u16),
        PrimitiveKind::U32 => Value::U32(v as u32),
        _ => Value::U64(v as u64),
    }
}

fn to_int(kind: PrimitiveKind, n: Number, shown: impl Fn() -> String) -> Result<Value, ConvertError> {
    let out_of_range = || ConvertError::OutOfRange {
        value: shown(),
        to: kind.name().to_string(),
    };
    let v = match n {
        Number::Int(v) => v,
        Number::Float(f) => {
            if !f.is_finite() || f.fract() != 0.0 || f.abs() >= 1e38 {
                return Err(out_of_range());
            }
            f as i128
        }
    };
    let (min, max) = int_bounds(kind);
    if v < min || v > max {
        return Err(out_of_range());
    }
    Ok(make_int(kind, v))
}

fn to_float(kind: PrimitiveKind, n: Number, shown: impl Fn() -> String) -> Result<Value, ConvertError> {
    let f = match n {
        Number::Int(v) => v as f64,
        Number::Float(f) => f,
    };
    if kind == PrimitiveKind::F32 {
        if f.is_finite() && f.abs() > f64::from(f32::MAX) {
            return Err(ConvertError::OutOfRange {
                value: shown(),
                to: kind.name().to_string(),
            });
        }
        return Ok(Value::F32(f as f32));
    }
    Ok(Value::F64(f))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_number(text: &str, kind: PrimitiveKind) -> Option<Number> {
    if kind.is_integer() {
        if let Ok(v) = text.parse::<i128>() {
            return Some(Number::Int(v));
        }
    }
    text.parse::<f64>().ok().map(Number::Float)
}

/// Convert a non-null scalar to primitive `kind`.
pub(crate) fn to_primitive(value: &Value, kind: PrimitiveKind) -> Result<Value, ConvertError> {
    let unsupported = || ConvertError::Unsupported {
        from: value.type_label(),
        to: kind.name().to_string(),
    };

    if let Value::Text(text) = value {
        let trimmed = text.trim();
        let parse_err = || ConvertError::Parse {
            input: text.to_string(),
            to: kind.name().to_string(),
        };
        return match kind {
            PrimitiveKind::Bool => parse_bool(trimmed).map(Value::Bool).ok_or_else(parse_err),
            PrimitiveKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(parse_err()),
                }
            }
            k if k.is_float() => {
                let n = parse_number(trimmed, k).ok_or_else(parse_err)?;
                to_float(k, n, || text.to_string())
            }
            k => {
                let n = parse_number(trimmed, k).ok_or_else(parse_err)?;
                to_int(k, n, || text.to_string())
            }
        };
    }

    match kind {
        PrimitiveKind::Bool => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(unsupported()),
        },
        PrimitiveKind::Char => match value {
            Value::Char(c) => Ok(Value::Char(*c)),
            Value::Bool(_) | Value::F32(_) | Value::F64(_) | Value::Enum(_) => Err(unsupported()),
            other => {
                let Some(Number::Int(code)) = number(other) else {
                    return Err(unsupported());
                };
                u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .map(Value::Char)
                    .ok_or_else(|| ConvertError::OutOfRange {
                        value: code.to_string(),
                        to: "char".to_string(),
                    })
            }
        },
        k => {
            let n = number(value).ok_or_else(unsupported)?;
            let shown = || format!("{:?}", value);
            if k.is_float() {
                to_float(k, n, shown)
            } else {
                to_int(k, n, shown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_and_narrowing() {
        assert_eq!(to_primitive(&Value::I32(7), PrimitiveKind::I64), Ok(Value::I64(7)));
        assert_eq!(to_primitive(&Value::I64(100), PrimitiveKind::U8), Ok(Value::U8(100)));
        assert!(matches!(
            to_primitive(&Value::I64(300), PrimitiveKind::U8),
            Err(ConvertError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_primitive(&Value::I32(-1), PrimitiveKind::U32),
            Err(ConvertError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_float_to_int_requires_integral() {
        assert_eq!(to_primitive(&Value::F64(5.0), PrimitiveKind::I32), Ok(Value::I32(5)));
        assert!(to_primitive(&Value::F64(5.5), PrimitiveKind::I32).is_err());
        assert!(to_primitive(&Value::F64(f64::NAN), PrimitiveKind::I64).is_err());
    }

    #[test]
    fn test_text_parsing() {
        assert_eq!(to_primitive(&Value::text(" 42 "), PrimitiveKind::I32), Ok(Value::I32(42)));
        assert_eq!(to_primitive(&Value::text("2.5"), PrimitiveKind::F64), Ok(Value::F64(2.5)));
        assert_eq!(to_primitive(&Value::text("YES"), PrimitiveKind::Bool), Ok(Value::Bool(true)));
        assert_eq!(to_primitive(&Value::text("x"), PrimitiveKind::Char), Ok(Value::Char('x')));
        assert!(matches!(
            to_primitive(&Value::text("abc"), PrimitiveKind::I32),
            Err(ConvertError::Parse { .. })
        ));
    }

    #[test]
    fn test_bool_is_not_numeric() {
        assert!(matches!(
            to_primitive(&Value::Bool(true), PrimitiveKind::I32),
            Err(ConvertError::Unsupported { .. })
        ));
        assert!(to_primitive(&Value::I32(1), PrimitiveKind::Bool).is_err());
    }

    #[test]
    fn test_char_code_points() {
        assert_eq!(to_primitive(&Value::U32(65), PrimitiveKind::Char), Ok(Value::Char('A')));
        assert_eq!(to_primitive(&Value::Char('A'), PrimitiveKind::U8), Ok(Value::U8(65)));
    }
}
