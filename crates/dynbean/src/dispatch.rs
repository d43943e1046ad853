// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Method invocation by name.
//!
//! Candidates for `(type, name, argument count)` are collected once, in
//! registration order. Resolution makes two passes over them: the first
//! accepts only arguments assignable as is, the second lets the converter
//! coerce arguments whose parameter type is convertible. The first
//! candidate matching every position wins, and is remembered for the
//! argument type tuple.

use crate::access::call_method;
use crate::convert::Coercer;
use crate::error::{MappingError, Result};
use crate::introspect::{MethodDef, TypeDescriptor};
use crate::value::{ObjectRef, Value, ValueType};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

type CandidateKey = (TypeId, String, usize);
type WinnerKey = (TypeId, String, Vec<ValueType>);

/// Cached overload resolution.
#[derive(Debug, Default)]
pub struct MethodDispatcher {
    candidates: DashMap<CandidateKey, Arc<[usize]>>,
    winners: DashMap<WinnerKey, usize>,
}

impl MethodDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke `name` on `object` with `args`.
    ///
    /// A chained setter (declared to return the bean itself) yields the
    /// receiver.
    pub fn invoke(
        &self,
        descriptor: &TypeDescriptor,
        object: &ObjectRef,
        name: &str,
        args: Vec<Value>,
        coercer: &Coercer,
    ) -> Result<Value> {
        let type_id = descriptor.bean_type().id();
        let signature: Vec<ValueType> = args.iter().map(Value::runtime_type).collect();
        let winner_key = (type_id, name.to_string(), signature);

        let cached = self.winners.get(&winner_key).map(|w| *w.value());
        let resolved = match cached {
            Some(index) => prepare(&descriptor.methods()[index], &args, coercer, true)
                .map(|args| (index, args)),
            None => None,
        };
        let (index, call_args) = match resolved {
            Some(hit) => hit,
            None => {
                let candidates = self.candidates(descriptor, name, args.len());
                let found = resolve(descriptor, &candidates, &args, coercer).ok_or_else(|| {
                    MappingError::NoMatchingMethod {
                        type_name: descriptor.bean_type().name(),
                        method: name.to_string(),
                        arg_types: args.iter().map(Value::type_label).collect(),
                    }
                })?;
                log::debug!(
                    "[dispatch] {}::{}{:?} resolved to overload #{}",
                    descriptor.name(),
                    name,
                    winner_key.2,
                    found.0
                );
                self.winners.insert(winner_key, found.0);
                found
            }
        };

        let method = &descriptor.methods()[index];
        let result = call_method(method, object, call_args)
            .map_err(|e| MappingError::invocation(descriptor.bean_type().name(), name, e))?;

        if result.is_null() && method.returns() == &ValueType::Object(descriptor.bean_type()) {
            return Ok(Value::Object(object.clone()));
        }
        Ok(result)
    }

    /// Number of cached `(type, name, argc)` candidate lists.
    pub fn candidate_entries(&self) -> usize {
        self.candidates.len()
    }

    /// Number of cached winners.
    pub fn winner_entries(&self) -> usize {
        self.winners.len()
    }

    fn candidates(&self, descriptor: &TypeDescriptor, name: &str, argc: usize) -> Arc<[usize]> {
        let key = (descriptor.bean_type().id(), name.to_string(), argc);
        if let Some(hit) = self.candidates.get(&key) {
            return Arc::clone(hit.value());
        }
        let built: Arc<[usize]> = descriptor.method_candidates(name, argc).into();
        Arc::clone(self.candidates.entry(key).or_insert(built).value())
    }
}

/// First candidate accepting every argument as is, else the first one
/// accepting them after coercion.
fn resolve(
    descriptor: &TypeDescriptor,
    candidates: &[usize],
    args: &[Value],
    coercer: &Coercer,
) -> Option<(usize, Vec<Value>)> {
    [false, true].into_iter().find_map(|coerce| {
        candidates.iter().find_map(|&index| {
            prepare(&descriptor.methods()[index], args, coercer, coerce).map(|a| (index, a))
        })
    })
}

/// Arguments for `method`, or `None` if some position does not fit.
fn prepare(method: &MethodDef, args: &[Value], coercer: &Coercer, coerce: bool) -> Option<Vec<Value>> {
    method
        .params()
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            if coercer.accepts(param, arg) {
                Some(arg.clone())
            } else if coerce && coercer.is_convertible(param) && is_scalar(arg) {
                coercer.converter().convert(arg, param).ok()
            } else {
                None
            }
        })
        .collect()
}

/// Argument types the converter may coerce from.
fn is_scalar(arg: &Value) -> bool {
    arg.is_immutable() || matches!(arg, Value::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bean, BeanType, DescriptorBuilder};

    #[derive(Debug, Default, Clone)]
    struct Calc {
        last: String,
        total: i64,
    }

    impl Bean for Calc {
        fn describe(desc: DescriptorBuilder<Self>) -> DescriptorBuilder<Self> {
            desc.default_constructor()
                .method1("f", |c: &mut Calc, v: String| {
                    c.last = format!("text:{}", v);
                })
                .method1("f", |c: &mut Calc, v: i32| {
                    c.last = format!("int:{}", v);
                })
                .method2("add", |c: &mut Calc, a: i64, b: i64| {
                    c.total = a + b;
                    c.total
                })
                .chained_setter("setTotal", |c: &mut Calc, v: i64| c.total = v)
                .static_method(
                    "version",
                    Vec::new(),
                    ValueType::Text,
                    |_args: Vec<Value>| Ok(Value::text("1.0")),
                )
        }
    }

    struct Fixture {
        descriptor: TypeDescriptor,
        object: ObjectRef,
        coercer: Coercer,
        dispatcher: MethodDispatcher,
    }

    fn fixture() -> Fixture {
        Fixture {
            descriptor: BeanType::of::<Calc>().build(),
            object: ObjectRef::new(Calc::default()),
            coercer: Coercer::default(),
            dispatcher: MethodDispatcher::new(),
        }
    }

    impl Fixture {
        fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value> {
            self.dispatcher
                .invoke(&self.descriptor, &self.object, name, args, &self.coercer)
        }

        fn last(&self) -> String {
            self.object.with(|c: &Calc| c.last.clone()).unwrap_or_default()
        }
    }

    #[test]
    fn test_int_overload_beats_text() {
        let fx = fixture();
        fx.invoke("f", vec![Value::I32(3)]).expect("invoke");
        assert_eq!(fx.last(), "int:3");

        fx.invoke("f", vec![Value::text("3")]).expect("invoke");
        assert_eq!(fx.last(), "text:3");
    }

    #[test]
    fn test_coercion_pass() {
        let fx = fixture();
        // i64 matches neither as is; text is first in declared order and
        // every scalar converts to text.
        fx.invoke("f", vec![Value::I64(8)]).expect("invoke");
        assert_eq!(fx.last(), "text:8");

        let sum = fx
            .invoke("add", vec![Value::I32(2), Value::text("40")])
            .expect("invoke");
        assert_eq!(sum, Value::I64(42));
    }

    #[test]
    fn test_no_matching_method() {
        let fx = fixture();
        match fx.invoke("add", vec![Value::I32(1)]) {
            Err(MappingError::NoMatchingMethod { method, arg_types, .. }) => {
                assert_eq!(method, "add");
                assert_eq!(arg_types.len(), 1);
            }
            other => panic!("expected no match, got {:?}", other),
        }
        assert!(fx.invoke("add", vec![Value::text("x"), Value::I32(1)]).is_err());
    }

    #[test]
    fn test_chained_setter_returns_receiver() {
        let fx = fixture();
        let out = fx.invoke("setTotal", vec![Value::I64(5)]).expect("invoke");
        assert!(out.as_object().is_some_and(|o| o.ptr_eq(&fx.object)));
        assert_eq!(fx.object.with(|c: &Calc| c.total), Some(5));
    }

    #[test]
    fn test_static_method() {
        let fx = fixture();
        assert_eq!(fx.invoke("version", Vec::new()).ok(), Some(Value::text("1.0")));
    }

    #[test]
    fn test_winner_cache() {
        let fx = fixture();
        fx.invoke("f", vec![Value::I32(1)]).expect("invoke");
        fx.invoke("f", vec![Value::I32(2)]).expect("invoke");
        assert_eq!(fx.dispatcher.candidate_entries(), 1);
        assert_eq!(fx.dispatcher.winner_entries(), 1);

        fx.invoke("f", vec![Value::text("a")]).expect("invoke");
        assert_eq!(fx.dispatcher.candidate_entries(), 1);
        assert_eq!(fx.dispatcher.winner_entries(), 2);
        assert_eq!(fx.last(), "text:a");
    }
}
