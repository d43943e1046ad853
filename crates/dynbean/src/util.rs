// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value helpers shared by every component: emptiness, deep equality,
//! hashing consistent with that equality, ordering for sorted containers,
//! and the assignability memo.

use crate::value::{Value, ValueType};
use dashmap::DashMap;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Null, empty text, or an empty container.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        Value::List(list) => list.is_empty(),
        Value::Set(set) => set.is_empty(),
        Value::Map(map) => map.is_empty(),
        Value::Array(array) => array.is_empty(),
        _ => false,
    }
}

/// Deep equality by value.
///
/// Scalars must have the same variant (`I32(1) != I64(1)`); floats compare
/// by total order so that equality and [`value_hash`] agree. Containers
/// compare element-wise (sets and maps ignore order). Beans compare by
/// identity.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    if a.same_instance(b) {
        return true;
    }
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::I8(x), Value::I8(y)) => x == y,
        (Value::I16(x), Value::I16(y)) => x == y,
        (Value::I32(x), Value::I32(y)) => x == y,
        (Value::I64(x), Value::I64(y)) => x == y,
        (Value::U8(x), Value::U8(y)) => x == y,
        (Value::U16(x), Value::U16(y)) => x == y,
        (Value::U32(x), Value::U32(y)) => x == y,
        (Value::U64(x), Value::U64(y)) => x == y,
        (Value::F32(x), Value::F32(y)) => x.total_cmp(y).is_eq(),
        (Value::F64(x), Value::F64(y)) => x.total_cmp(y).is_eq(),
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Enum(x), Value::Enum(y)) => x == y,
        (Value::List(x), Value::List(y)) => ordered_equal(&x.snapshot(), &y.snapshot()),
        (Value::Array(x), Value::Array(y)) => ordered_equal(&x.snapshot(), &y.snapshot()),
        (Value::Set(x), Value::Set(y)) => {
            let (xs, ys) = (x.snapshot(), y.snapshot());
            xs.len() == ys.len() && xs.iter().all(|v| y.contains(v))
        }
        (Value::Map(x), Value::Map(y)) => {
            let (xs, ys) = (x.snapshot(), y.snapshot());
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| values_equal(v, &other)))
        }
        _ => false,
    }
}

fn ordered_equal(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
}

/// Hash consistent with [`values_equal`].
pub fn value_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_into(value, &mut hasher);
    hasher.finish()
}

fn hash_into<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(v) => v.hash(state),
        Value::Char(v) => v.hash(state),
        Value::I8(v) => v.hash(state),
        Value::I16(v) => v.hash(state),
        Value::I32(v) => v.hash(state),
        Value::I64(v) => v.hash(state),
        Value::U8(v) => v.hash(state),
        Value::U16(v) => v.hash(state),
        Value::U32(v) => v.hash(state),
        Value::U64(v) => v.hash(state),
        Value::F32(v) => v.to_bits().hash(state),
        Value::F64(v) => v.to_bits().hash(state),
        Value::Text(v) => v.hash(state),
        Value::Enum(v) => v.hash(state),
        Value::List(list) => {
            for item in list.snapshot() {
                hash_into(&item, state);
            }
        }
        Value::Array(array) => {
            for item in array.snapshot() {
                hash_into(&item, state);
            }
        }
        // Unordered: combine element hashes commutatively.
        Value::Set(set) => {
            let combined = set
                .snapshot()
                .iter()
                .fold(0u64, |acc, item| acc.wrapping_add(value_hash(item)));
            combined.hash(state);
        }
        Value::Map(map) => {
            let combined = map.snapshot().iter().fold(0u64, |acc, (k, v)| {
                acc.wrapping_add(value_hash(k).rotate_left(7) ^ value_hash(v))
            });
            combined.hash(state);
        }
        Value::Object(object) => object.addr().hash(state),
    }
}

/// Ordering used by sorted sets and maps.
///
/// Numbers compare numerically across kinds, text lexically, enums by
/// ordinal. Values of unrelated kinds order by a fixed kind rank.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Char(x), Value::Char(y)) => x.cmp(y),
        (Value::Enum(x), Value::Enum(y)) => x.ordinal.cmp(&y.ordinal),
        _ => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => kind_rank(a).cmp(&kind_rank(b)),
            },
        },
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Char(_) => 2,
        Value::I8(_)
        | Value::I16(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::U8(_)
        | Value::U16(_)
        | Value::U32(_)
        | Value::U64(_)
        | Value::F32(_)
        | Value::F64(_) => 3,
        Value::Text(_) => 4,
        Value::Enum(_) => 5,
        Value::List(_) => 6,
        Value::Set(_) => 7,
        Value::Map(_) => 8,
        Value::Array(_) => 9,
        Value::Object(_) => 10,
    }
}

/// Memo of `(declared, runtime) -> assignable` answers.
///
/// Entries are write-once; concurrent computations of the same pair agree
/// because the computation is deterministic.
#[derive(Debug, Default)]
pub struct AssignabilityCache {
    answers: DashMap<(ValueType, ValueType), bool>,
}

impl AssignabilityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached answer for `(declared, runtime)`, computing it on first use.
    pub fn check<F>(&self, declared: &ValueType, runtime: &ValueType, compute: F) -> bool
    where
        F: FnOnce(&ValueType, &ValueType) -> bool,
    {
        let key = (declared.clone(), runtime.clone());
        if let Some(hit) = self.answers.get(&key) {
            return *hit;
        }
        let answer = compute(declared, runtime);
        *self.answers.entry(key).or_insert(answer)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveKind;

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&Value::from("")));
        assert!(is_empty(&Value::list(Vec::new())));
        assert!(!is_empty(&Value::from(0i32)));
    }

    #[test]
    fn test_equality_requires_same_variant() {
        assert!(values_equal(&Value::I32(1), &Value::I32(1)));
        assert!(!values_equal(&Value::I32(1), &Value::I64(1)));
        assert!(values_equal(&Value::F64(f64::NAN), &Value::F64(f64::NAN)));
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a = Value::set(vec![Value::from(1i32), Value::from(2i32)]);
        let b = Value::set(vec![Value::from(2i32), Value::from(1i32)]);
        assert!(values_equal(&a, &b));
        assert_eq!(value_hash(&a), value_hash(&b));
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let a = Value::map([("k", Value::list(vec![Value::from("v")]))]);
        let b = Value::map([("k", Value::list(vec![Value::from("v")]))]);
        assert!(values_equal(&a, &b));
        assert_eq!(value_hash(&a), value_hash(&b));
    }

    #[test]
    fn test_compare_across_numeric_kinds() {
        assert!(compare_values(&Value::I8(1), &Value::I64(2)).is_lt());
        assert!(compare_values(&Value::F64(2.5), &Value::I32(2)).is_gt());
        assert!(compare_values(&Value::from("b"), &Value::from("a")).is_gt());
    }

    #[test]
    fn test_assignability_cache_computes_once() {
        let cache = AssignabilityCache::new();
        let declared = ValueType::Primitive(PrimitiveKind::I32);
        let runtime = ValueType::Boxed(PrimitiveKind::I32);

        assert!(cache.check(&declared, &runtime, |_, _| true));
        // A second, contradicting computation is never consulted.
        assert!(cache.check(&declared, &runtime, |_, _| false));
        assert_eq!(cache.len(), 1);
    }
}
