// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent registration API used by [`Bean::describe`].
//!
//! Every typed closure is erased here into the `dyn Any` based bodies the
//! descriptor stores. Arguments reaching a typed body are converted with
//! [`FromValue`]; a mismatch surfaces as [`ArgumentMismatch`], which the
//! property accessor treats as a soft failure.
//!
//! Conversion happens before the receiver is locked: converting a bean
//! argument locks that bean, and it may be the receiver itself.

use crate::error::BoxError;
use crate::introspect::descriptor::{
    Apply, FieldApply, FieldDef, MethodBody, MethodDef, TypeDescriptor, Visibility,
};
use crate::introspect::Bean;
use crate::value::{BeanType, FromValue, IntoValue, ObjectRef, Typed, Value, ValueType};
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// An argument did not have the shape a typed body expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentMismatch {
    pub index: usize,
    pub expected: String,
    pub got: String,
}

impl fmt::Display for ArgumentMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Argument {} expected {}, got {}",
            self.index, self.expected, self.got
        )
    }
}

impl Error for ArgumentMismatch {}

/// The receiver did not downcast to the registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverMismatch {
    pub expected: &'static str,
}

impl fmt::Display for ReceiverMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Receiver is not a {}", self.expected)
    }
}

impl Error for ReceiverMismatch {}

fn take_arg<A: FromValue + Typed>(args: &mut Vec<Value>, index: usize) -> Result<A, BoxError> {
    let value = std::mem::take(&mut args[index]);
    let got = value.type_label();
    A::from_value(value).ok_or_else(|| {
        Box::new(ArgumentMismatch {
            index,
            expected: A::value_type().to_string(),
            got,
        }) as BoxError
    })
}

fn receiver<T: Bean>(instance: &dyn Any) -> Result<&T, BoxError> {
    instance.downcast_ref::<T>().ok_or_else(|| {
        Box::new(ReceiverMismatch {
            expected: std::any::type_name::<T>(),
        }) as BoxError
    })
}

fn receiver_mut<T: Bean>(instance: &mut dyn Any) -> Result<&mut T, BoxError> {
    instance.downcast_mut::<T>().ok_or_else(|| {
        Box::new(ReceiverMismatch {
            expected: std::any::type_name::<T>(),
        }) as BoxError
    })
}

/// Builder collecting the capability table of `T`.
pub struct DescriptorBuilder<T: Bean> {
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
    constructor: Option<Arc<dyn Fn() -> crate::value::AnyBean + Send + Sync>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Bean> DescriptorBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            methods: Vec::new(),
            fields: Vec::new(),
            constructor: None,
            _marker: PhantomData,
        }
    }

    fn push_field<V, G, S>(
        mut self,
        name: &str,
        visibility: Visibility,
        is_final: bool,
        get: G,
        set: S,
    ) -> Self
    where
        V: Typed + IntoValue + FromValue + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let set = Arc::new(set);
        self.fields.push(FieldDef {
            name: name.to_string(),
            declared: V::value_type(),
            visibility,
            is_final,
            get: Arc::new(move |instance: &dyn Any| {
                instance
                    .downcast_ref::<T>()
                    .map_or(Value::Null, |bean| get(bean).into_value())
            }),
            set: Arc::new(move |value: Value| -> Option<FieldApply> {
                let value = V::from_value(value)?;
                let set = Arc::clone(&set);
                Some(Box::new(move |instance: &mut dyn Any| {
                    match instance.downcast_mut::<T>() {
                        Some(bean) => {
                            set(bean, value);
                            true
                        }
                        None => false,
                    }
                }))
            }),
        });
        self
    }

    /// Public, writable field.
    pub fn field<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: Typed + IntoValue + FromValue + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push_field(name, Visibility::Public, false, get, set)
    }

    /// Private field: only reached through `force`, or through a getter or
    /// setter registered under the same property name.
    pub fn private_field<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: Typed + IntoValue + FromValue + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push_field(name, Visibility::Private, false, get, set)
    }

    /// Public read-only field; assignment needs `force`.
    pub fn final_field<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: Typed + IntoValue + FromValue + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push_field(name, Visibility::Public, true, get, set)
    }

    /// Register an arbitrary method from its raw parts. The arguments reach
    /// `body` unconverted, under the receiver's write lock.
    pub fn method_raw(
        self,
        name: &str,
        params: Vec<ValueType>,
        returns: ValueType,
        body: impl Fn(&mut T, Vec<Value>) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.push_write(name, params, returns, |args: Vec<Value>| Ok(args), body)
    }

    /// Register a write method whose arguments are converted by `prepare`
    /// before the receiver is locked for `apply`.
    fn push_write<P, Prep, App>(
        mut self,
        name: &str,
        params: Vec<ValueType>,
        returns: ValueType,
        prepare: Prep,
        apply: App,
    ) -> Self
    where
        P: 'static,
        Prep: Fn(Vec<Value>) -> Result<P, BoxError> + Send + Sync + 'static,
        App: Fn(&mut T, P) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let apply = Arc::new(apply);
        self.methods.push(MethodDef {
            name: name.to_string(),
            params,
            returns,
            body: MethodBody::Write(Arc::new(
                move |args: Vec<Value>| -> Result<Apply, BoxError> {
                    let prepared = prepare(args)?;
                    let apply = Arc::clone(&apply);
                    Ok(Box::new(move |instance: &mut dyn Any| {
                        apply(receiver_mut::<T>(instance)?, prepared)
                    }))
                },
            )),
        });
        self
    }

    /// Register a static method (never a property accessor).
    pub fn static_method(
        mut self,
        name: &str,
        params: Vec<ValueType>,
        returns: ValueType,
        body: impl Fn(Vec<Value>) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.push(MethodDef {
            name: name.to_string(),
            params,
            returns,
            body: MethodBody::Static(Arc::new(body)),
        });
        self
    }

    /// Zero-argument read method. Named `get_x`/`getX` (or `is_x`/`isX`
    /// returning bool) it becomes the getter of property `x`.
    pub fn getter<R, F>(mut self, name: &str, get: F) -> Self
    where
        R: Typed + IntoValue,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name: name.to_string(),
            params: Vec::new(),
            returns: R::value_type(),
            body: MethodBody::Read(Arc::new(
                move |instance: &dyn Any, _args: Vec<Value>| -> Result<Value, BoxError> {
                    Ok(get(receiver::<T>(instance)?).into_value())
                },
            )),
        });
        self
    }

    /// One-argument write method. Named `set_x`/`setX` it becomes a setter
    /// overload of property `x`.
    pub fn setter<A, F>(self, name: &str, set: F) -> Self
    where
        A: Typed + FromValue + 'static,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        self.try_setter(name, move |bean: &mut T, value: A| {
            set(bean, value);
            Ok::<(), BoxError>(())
        })
    }

    /// Setter that can fail. A failure is an invocation fault.
    pub fn try_setter<A, E, F>(self, name: &str, set: F) -> Self
    where
        A: Typed + FromValue + 'static,
        E: Into<BoxError>,
        F: Fn(&mut T, A) -> Result<(), E> + Send + Sync + 'static,
    {
        self.push_write(
            name,
            vec![A::value_type()],
            ValueType::Void,
            |mut args: Vec<Value>| take_arg::<A>(&mut args, 0),
            move |bean: &mut T, value: A| {
                set(bean, value).map_err(Into::<BoxError>::into)?;
                Ok(Value::Null)
            },
        )
    }

    /// Fluent setter: declared to return the bean itself, so invoking it
    /// yields the receiver for chaining.
    pub fn chained_setter<A, F>(self, name: &str, set: F) -> Self
    where
        A: Typed + FromValue + 'static,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        self.push_write(
            name,
            vec![A::value_type()],
            ValueType::Object(BeanType::of::<T>()),
            |mut args: Vec<Value>| take_arg::<A>(&mut args, 0),
            move |bean: &mut T, value: A| {
                set(bean, value);
                Ok(Value::Null)
            },
        )
    }

    pub fn method0<R, F>(self, name: &str, body: F) -> Self
    where
        R: Typed + IntoValue,
        F: Fn(&mut T) -> R + Send + Sync + 'static,
    {
        self.push_write(
            name,
            Vec::new(),
            R::value_type(),
            |_args: Vec<Value>| Ok(()),
            move |bean: &mut T, ()| Ok(body(bean).into_value()),
        )
    }

    pub fn method1<A, R, F>(self, name: &str, body: F) -> Self
    where
        A: Typed + FromValue + 'static,
        R: Typed + IntoValue,
        F: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        self.push_write(
            name,
            vec![A::value_type()],
            R::value_type(),
            |mut args: Vec<Value>| take_arg::<A>(&mut args, 0),
            move |bean: &mut T, a: A| Ok(body(bean, a).into_value()),
        )
    }

    pub fn method2<A, B, R, F>(self, name: &str, body: F) -> Self
    where
        A: Typed + FromValue + 'static,
        B: Typed + FromValue + 'static,
        R: Typed + IntoValue,
        F: Fn(&mut T, A, B) -> R + Send + Sync + 'static,
    {
        self.push_write(
            name,
            vec![A::value_type(), B::value_type()],
            R::value_type(),
            |mut args: Vec<Value>| {
                Ok((take_arg::<A>(&mut args, 0)?, take_arg::<B>(&mut args, 1)?))
            },
            move |bean: &mut T, (a, b): (A, B)| Ok(body(bean, a, b).into_value()),
        )
    }

    pub fn method3<A, B, C, R, F>(self, name: &str, body: F) -> Self
    where
        A: Typed + FromValue + 'static,
        B: Typed + FromValue + 'static,
        C: Typed + FromValue + 'static,
        R: Typed + IntoValue,
        F: Fn(&mut T, A, B, C) -> R + Send + Sync + 'static,
    {
        self.push_write(
            name,
            vec![A::value_type(), B::value_type(), C::value_type()],
            R::value_type(),
            |mut args: Vec<Value>| {
                Ok((
                    take_arg::<A>(&mut args, 0)?,
                    take_arg::<B>(&mut args, 1)?,
                    take_arg::<C>(&mut args, 2)?,
                ))
            },
            move |bean: &mut T, (a, b, c): (A, B, C)| Ok(body(bean, a, b, c).into_value()),
        )
    }

    /// No-argument constructor.
    pub fn constructor<F>(mut self, make: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || Box::new(make()) as crate::value::AnyBean));
        self
    }

    /// Register a public zero-argument `clone` method that duplicates the
    /// instance.
    pub fn cloneable(mut self) -> Self
    where
        T: Clone,
    {
        self.methods.push(MethodDef {
            name: "clone".to_string(),
            params: Vec::new(),
            returns: ValueType::Object(BeanType::of::<T>()),
            body: MethodBody::Read(Arc::new(
                |instance: &dyn Any, _args: Vec<Value>| -> Result<Value, BoxError> {
                    Ok(Value::Object(ObjectRef::new(receiver::<T>(instance)?.clone())))
                },
            )),
        });
        self
    }

    pub(crate) fn build(self) -> TypeDescriptor {
        TypeDescriptor::scan(
            BeanType::of::<T>(),
            self.methods,
            self.fields,
            self.constructor,
        )
    }
}

impl<T: Bean + Default> DescriptorBuilder<T> {
    /// Constructor backed by `Default`.
    pub fn default_constructor(self) -> Self {
        self.constructor(T::default)
    }
}
