// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable per-type metadata.
//!
//! A [`TypeDescriptor`] is produced by scanning the methods and fields a
//! type registered in [`Bean::describe`](crate::Bean::describe). The scan
//! classifies methods into getters and setters by name convention, indexes
//! overloaded setters by parameter type, and builds the alias table.

use crate::error::BoxError;
use crate::introspect::naming::{
    bool_getter_property, getter_property, setter_property, NameResolver,
};
use crate::value::{AnyBean, BeanType, PrimitiveKind, Value, ValueType};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub(crate) type ReadFn =
    Arc<dyn Fn(&dyn Any, Vec<Value>) -> Result<Value, BoxError> + Send + Sync>;
/// Deferred mutation produced once the arguments are converted.
pub(crate) type Apply = Box<dyn FnOnce(&mut dyn Any) -> Result<Value, BoxError>>;
/// Converts the arguments with no lock held. The returned [`Apply`] runs
/// under the receiver's write lock.
pub(crate) type WriteFn = Arc<dyn Fn(Vec<Value>) -> Result<Apply, BoxError> + Send + Sync>;
pub(crate) type StaticFn = Arc<dyn Fn(Vec<Value>) -> Result<Value, BoxError> + Send + Sync>;
pub(crate) type FieldGetFn = Arc<dyn Fn(&dyn Any) -> Value + Send + Sync>;
/// Deferred field assignment; `false` when the receiver is not the owner.
pub(crate) type FieldApply = Box<dyn FnOnce(&mut dyn Any) -> bool>;
/// `None` when the value does not convert to the field type.
pub(crate) type FieldSetFn = Arc<dyn Fn(Value) -> Option<FieldApply> + Send + Sync>;
pub(crate) type ConstructorFn = Arc<dyn Fn() -> AnyBean + Send + Sync>;

/// How a method reaches its receiver.
#[derive(Clone)]
pub(crate) enum MethodBody {
    /// Shared borrow of the instance.
    Read(ReadFn),
    /// Exclusive borrow of the instance, taken only after the arguments
    /// are converted.
    Write(WriteFn),
    /// No receiver.
    Static(StaticFn),
}

/// A registered method signature and its body.
#[derive(Clone)]
pub struct MethodDef {
    pub(crate) name: String,
    pub(crate) params: Vec<ValueType>,
    pub(crate) returns: ValueType,
    pub(crate) body: MethodBody,
}

impl MethodDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    pub fn returns(&self) -> &ValueType {
        &self.returns
    }

    pub fn is_static(&self) -> bool {
        matches!(self.body, MethodBody::Static(_))
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "{}({}) -> {}", self.name, params.join(", "), self.returns)
    }
}

/// Field visibility. Only public fields are written without `force`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A registered field accessor.
#[derive(Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) declared: ValueType,
    pub(crate) visibility: Visibility,
    pub(crate) is_final: bool,
    pub(crate) get: FieldGetFn,
    pub(crate) set: FieldSetFn,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> &ValueType {
        &self.declared
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Writable without bypassing visibility or finality.
    pub fn is_writable(&self) -> bool {
        self.visibility == Visibility::Public && !self.is_final
    }

    /// Readable without bypassing visibility.
    pub fn is_readable(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("visibility", &self.visibility)
            .field("is_final", &self.is_final)
            .finish()
    }
}

/// Overloaded setters of one property, indexed by parameter type.
#[derive(Clone, Default)]
pub struct SetterTable {
    overloads: Vec<MethodDef>,
    by_type: HashMap<ValueType, usize>,
}

impl SetterTable {
    fn add(&mut self, method: MethodDef) {
        let index = self.overloads.len();
        let param = method.params[0].clone();
        // Register the boxed and unboxed spelling so both argument forms hit.
        self.by_type.entry(param.boxed()).or_insert(index);
        self.by_type.entry(param.unboxed()).or_insert(index);
        self.overloads.push(method);
    }

    /// Setter whose parameter is exactly `param` (boxed or unboxed).
    pub fn exact(&self, param: &ValueType) -> Option<&MethodDef> {
        self.by_type.get(param).map(|&i| &self.overloads[i])
    }

    /// All overloads in registration order.
    pub fn overloads(&self) -> &[MethodDef] {
        &self.overloads
    }

    pub fn len(&self) -> usize {
        self.overloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overloads.is_empty()
    }
}

/// Everything known about one property: its getter, setter overloads,
/// backing field and declared type.
#[derive(Clone)]
pub struct PropertyAccessor {
    pub(crate) owner: BeanType,
    pub(crate) name: String,
    pub(crate) declared: ValueType,
    pub(crate) getter: Option<MethodDef>,
    pub(crate) setters: SetterTable,
    pub(crate) field: Option<FieldDef>,
}

impl PropertyAccessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type: getter return type, else backing field, else first
    /// setter parameter.
    pub fn declared(&self) -> &ValueType {
        &self.declared
    }

    /// Declared element type of a container property.
    pub fn element_type(&self) -> Option<&ValueType> {
        self.declared.element_type()
    }

    pub fn getter(&self) -> Option<&MethodDef> {
        self.getter.as_ref()
    }

    pub fn setters(&self) -> &SetterTable {
        &self.setters
    }

    pub fn field(&self) -> Option<&FieldDef> {
        self.field.as_ref()
    }

    /// Has a getter or a readable field.
    pub fn is_readable(&self) -> bool {
        self.getter.is_some() || self.field.as_ref().is_some_and(FieldDef::is_readable)
    }

    /// Has a setter or a writable field.
    pub fn is_writable(&self) -> bool {
        !self.setters.is_empty() || self.field.as_ref().is_some_and(FieldDef::is_writable)
    }

    /// The setter used for coerced assignment: the overload taking the
    /// declared type, else the only overload.
    pub(crate) fn primary_setter(&self) -> Option<&MethodDef> {
        self.setters
            .exact(&self.declared)
            .or_else(|| match self.setters.overloads() {
                [only] => Some(only),
                _ => None,
            })
    }
}

impl fmt::Debug for PropertyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("getter", &self.getter)
            .field("setters", &self.setters.overloads)
            .field("field", &self.field)
            .finish()
    }
}

/// Immutable metadata for one bean type.
pub struct TypeDescriptor {
    bean_type: BeanType,
    properties: Vec<PropertyAccessor>,
    index: HashMap<String, usize>,
    aliases: NameResolver,
    methods: Vec<MethodDef>,
    constructor: Option<ConstructorFn>,
}

impl TypeDescriptor {
    /// Scan registered methods and fields into property accessors.
    pub(crate) fn scan(
        bean_type: BeanType,
        methods: Vec<MethodDef>,
        fields: Vec<FieldDef>,
        constructor: Option<ConstructorFn>,
    ) -> Self {
        let mut scan = Scan::default();

        for method in &methods {
            if method.is_static() {
                continue;
            }
            match method.params.len() {
                0 => {
                    let is_bool = matches!(
                        method.returns.primitive_kind(),
                        Some(PrimitiveKind::Bool)
                    );
                    let name = getter_property(&method.name).or_else(|| {
                        is_bool
                            .then(|| bool_getter_property(&method.name))
                            .flatten()
                    });
                    if let (Some(name), false) = (name, method.returns == ValueType::Void) {
                        let entry = scan.entry(&name);
                        if entry.getter.is_none() {
                            entry.getter = Some(method.clone());
                        }
                    }
                }
                1 => {
                    let fluent = method.returns == ValueType::Object(bean_type);
                    if method.returns != ValueType::Void && !fluent {
                        continue;
                    }
                    if let Some(name) = setter_property(&method.name) {
                        scan.entry(&name).setters.add(method.clone());
                    }
                }
                _ => {}
            }
        }

        for field in fields {
            let name = field.name.clone();
            scan.entry(&name).field = Some(field);
        }

        let mut aliases = NameResolver::new();
        let mut index = HashMap::with_capacity(scan.order.len());
        let mut properties = Vec::with_capacity(scan.order.len());
        for name in scan.order {
            let Some(parts) = scan.parts.remove(&name) else {
                continue;
            };
            let declared = parts
                .getter
                .as_ref()
                .map(|g| g.returns.clone())
                .or_else(|| parts.field.as_ref().map(|f| f.declared.clone()))
                .or_else(|| parts.setters.overloads().first().map(|s| s.params[0].clone()))
                .unwrap_or(ValueType::Any);
            aliases.register(&name);
            index.insert(name.clone(), properties.len());
            properties.push(PropertyAccessor {
                owner: bean_type,
                name,
                declared,
                getter: parts.getter,
                setters: parts.setters,
                field: parts.field,
            });
        }

        log::debug!(
            "[introspect] described {}: {} properties, {} methods, constructor={}",
            bean_type.short_name(),
            properties.len(),
            methods.len(),
            constructor.is_some()
        );

        Self {
            bean_type,
            properties,
            index,
            aliases,
            methods,
            constructor,
        }
    }

    pub fn bean_type(&self) -> BeanType {
        self.bean_type
    }

    /// Type name without module path.
    pub fn name(&self) -> &'static str {
        self.bean_type.short_name()
    }

    /// Property by exact name.
    pub fn property(&self, name: &str) -> Option<&PropertyAccessor> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// Property by any case/underscore variant of its name.
    pub fn property_ci(&self, alias: &str) -> Option<&PropertyAccessor> {
        self.property(alias)
            .or_else(|| self.property(self.aliases.canonicalize(alias)?))
    }

    /// All properties in registration order.
    pub fn properties(&self) -> &[PropertyAccessor] {
        &self.properties
    }

    /// Property names in registration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Canonical property name for an alias.
    pub fn canonicalize(&self, alias: &str) -> Option<&str> {
        self.aliases.canonicalize(alias)
    }

    pub fn name_resolver(&self) -> &NameResolver {
        &self.aliases
    }

    /// All registered methods in registration order.
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// Methods named `name` with `arg_count` parameters, as indices into
    /// [`TypeDescriptor::methods`], in registration order.
    pub fn method_candidates(&self, name: &str, arg_count: usize) -> Vec<usize> {
        self.methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name == name && m.params.len() == arg_count)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    pub(crate) fn constructor(&self) -> Option<&ConstructorFn> {
        self.constructor.as_ref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type", &self.bean_type)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Parts {
    getter: Option<MethodDef>,
    setters: SetterTable,
    field: Option<FieldDef>,
}

/// Property parts collected during a scan, in first-seen order.
#[derive(Default)]
struct Scan {
    order: Vec<String>,
    parts: HashMap<String, Parts>,
}

impl Scan {
    fn entry(&mut self, name: &str) -> &mut Parts {
        if !self.parts.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.parts.entry(name.to_string()).or_default()
    }
}
