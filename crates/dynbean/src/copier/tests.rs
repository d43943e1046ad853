// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::config::CyclePolicy;
use crate::{Bean, DescriptorBuilder};

#[derive(Debug, Clone, Default, PartialEq)]
struct Address {
    city: String,
    zip: String,
}

impl Bean for Address {
    fn describe(desc: DescriptorBuilder<Self>) -> DescriptorBuilder<Self> {
        desc.default_constructor()
            .getter("getCity", |a: &Address| a.city.clone())
            .setter("setCity", |a: &mut Address, v: String| a.city = v)
            .getter("getZip", |a: &Address| a.zip.clone())
            .setter("setZip", |a: &mut Address, v: String| a.zip = v)
    }
}

crate::impl_bean_value!(Address);

#[derive(Debug, Clone, Default)]
struct Profile {
    id: i32,
    name: String,
    tags: Vec<String>,
    user_name: String,
    score: f64,
    address: Option<Address>,
    history: Vec<Address>,
}

impl Bean for Profile {
    fn describe(desc: DescriptorBuilder<Self>) -> DescriptorBuilder<Self> {
        desc.default_constructor()
            .getter("getId", |p: &Profile| p.id)
            .setter("setId", |p: &mut Profile, v: i32| p.id = v)
            .field("name", |p: &Profile| p.name.clone(), |p: &mut Profile, v: String| p.name = v)
            .getter("getTags", |p: &Profile| p.tags.clone())
            .setter("setTags", |p: &mut Profile, v: Vec<String>| p.tags = v)
            .getter("getUserName", |p: &Profile| p.user_name.clone())
            .setter("setUserName", |p: &mut Profile, v: String| p.user_name = v)
            .getter("getScore", |p: &Profile| p.score)
            .setter("setScore", |p: &mut Profile, v: f64| p.score = v)
            .getter("getAddress", |p: &Profile| p.address.clone())
            .setter("setAddress", |p: &mut Profile, v: Option<Address>| p.address = v)
            .getter("getHistory", |p: &Profile| p.history.clone())
            .setter("setHistory", |p: &mut Profile, v: Vec<Address>| p.history = v)
            .getter("getDisplay", |p: &Profile| format!("{} ({})", p.name, p.id))
    }
}

#[derive(Debug, Default)]
struct Node {
    name: String,
    child: Option<ObjectRef>,
}

impl Bean for Node {
    fn describe(desc: DescriptorBuilder<Self>) -> DescriptorBuilder<Self> {
        let node = ValueType::Object(BeanType::of::<Node>());
        desc.default_constructor()
            .getter("getName", |n: &Node| n.name.clone())
            .setter("setName", |n: &mut Node, v: String| n.name = v)
            .method_raw("getChild", Vec::new(), node.clone(), |n: &mut Node, _args: Vec<Value>| {
                Ok(n.child.clone().map_or(Value::Null, Value::Object))
            })
            .method_raw("setChild", vec![node], ValueType::Void, |n: &mut Node, args: Vec<Value>| {
                n.child = args.first().and_then(Value::as_object).cloned();
                Ok(Value::Null)
            })
    }
}

struct Parts {
    cache: DescriptorCache,
    coercer: Coercer,
    cloner: Cloner,
}

impl Parts {
    fn new() -> Self {
        Self {
            cache: DescriptorCache::unbounded(),
            coercer: Coercer::default(),
            cloner: Cloner::new(),
        }
    }

    fn copier(&self, options: CopyOptions) -> GraphCopier<'_> {
        GraphCopier::new(&self.cache, &self.coercer, &self.cloner, options)
    }

    fn copy(&self, from: &Value, to: &Value, options: CopyOptions) -> Result<CopyReport> {
        let mut copier = self.copier(options);
        copier.copy(from, to)?;
        Ok(copier.finish())
    }
}

fn profile(value: &Value) -> Profile {
    value
        .as_object()
        .and_then(ObjectRef::get::<Profile>)
        .expect("profile instance")
}

#[test]
fn test_map_into_bean_with_independent_containers() {
    let parts = Parts::new();
    let tags = Value::list(vec![Value::text("a"), Value::text("b")]);
    let from = Value::map(vec![
        ("id", Value::I32(5)),
        ("name", Value::text("x")),
        ("tags", tags.clone()),
    ]);
    let to = Value::object(Profile::default());

    let report = parts.copy(&from, &to, CopyOptions::default()).expect("copy");
    let out = profile(&to);
    assert_eq!(out.id, 5);
    assert_eq!(out.name, "x");
    assert_eq!(out.tags, vec!["a".to_string(), "b".to_string()]);
    assert!(report.is_complete(), "unexpected skips: {:?}", report.skipped);

    // Mutating the source list leaves the target alone.
    tags.as_list().expect("list").push(Value::text("c"));
    assert_eq!(profile(&to).tags.len(), 2);
}

#[test]
fn test_case_insensitive_names() {
    let parts = Parts::new();
    let from = Value::map(vec![("USER_NAME", Value::text("ada")), ("Id", Value::I32(1))]);
    let to = Value::object(Profile::default());

    let strict = parts.copy(&from, &to, CopyOptions::default()).expect("copy");
    assert_eq!(strict.skip_reason("USER_NAME"), Some(&SkipReason::NoTarget));
    assert_eq!(profile(&to).user_name, "");

    let lenient = parts.copy(&from, &to, CopyOptions::case_insensitive()).expect("copy");
    assert!(lenient.was_copied("USER_NAME"));
    assert!(lenient.was_copied("Id"));
    assert_eq!(profile(&to).user_name, "ada");
    assert_eq!(profile(&to).id, 1);
}

#[test]
fn test_report_lists_skips() {
    let parts = Parts::new();
    let from = Value::map(vec![
        ("id", Value::Null),
        ("score", Value::text("high")),
        ("display", Value::text("ignored")),
        ("unknown", Value::I32(1)),
        ("name", Value::Null),
    ]);
    let to = Value::object(Profile::default());

    let report = parts.copy(&from, &to, CopyOptions::default()).expect("copy");
    assert_eq!(report.skip_reason("id"), Some(&SkipReason::NullToPrimitive));
    assert!(matches!(
        report.skip_reason("score"),
        Some(SkipReason::TypeMismatch { .. })
    ));
    assert_eq!(report.skip_reason("display"), Some(&SkipReason::NotWritable));
    assert_eq!(report.skip_reason("unknown"), Some(&SkipReason::NoTarget));
    // Text is nullable but the String field cannot hold null.
    assert!(matches!(
        report.skip_reason("name"),
        Some(SkipReason::TypeMismatch { .. })
    ));
}

#[test]
fn test_scalar_coercion() {
    let parts = Parts::new();
    let from = Value::map(vec![("id", Value::text("12")), ("score", Value::I32(3))]);
    let to = Value::object(Profile::default());

    parts.copy(&from, &to, CopyOptions::default()).expect("copy");
    let out = profile(&to);
    assert_eq!(out.id, 12);
    assert_eq!(out.score, 3.0);
}

#[test]
fn test_nested_map_becomes_bean() {
    let parts = Parts::new();
    let from = Value::map(vec![(
        "address",
        Value::map(vec![("city", Value::text("Lyon")), ("zip", Value::text("69001"))]),
    )]);
    let to = Value::object(Profile::default());

    let report = parts.copy(&from, &to, CopyOptions::default()).expect("copy");
    assert!(report.was_copied("address.city"));
    assert!(report.was_copied("address"));
    assert_eq!(
        profile(&to).address,
        Some(Address {
            city: "Lyon".to_string(),
            zip: "69001".to_string()
        })
    );
}

#[test]
fn test_nested_disabled_skips() {
    let parts = Parts::new();
    let from = Value::map(vec![("address", Value::map(vec![("city", Value::text("Lyon"))]))]);
    let to = Value::object(Profile::default());
    let options = CopyOptions {
        map_nested: false,
        ..CopyOptions::default()
    };

    let report = parts.copy(&from, &to, options).expect("copy");
    assert!(matches!(
        report.skip_reason("address"),
        Some(SkipReason::TypeMismatch { .. })
    ));
    assert_eq!(profile(&to).address, None);
}

#[test]
fn test_list_elements_are_instantiated() {
    let parts = Parts::new();
    let from = Value::map(vec![(
        "history",
        Value::list(vec![
            Value::map(vec![("city", Value::text("Paris"))]),
            Value::object(Address {
                city: "Nice".to_string(),
                zip: "06000".to_string(),
            }),
            Value::I32(3),
        ]),
    )]);
    let to = Value::object(Profile::default());

    let report = parts.copy(&from, &to, CopyOptions::default()).expect("copy");
    let history = profile(&to).history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].city, "Paris");
    assert_eq!(history[1].zip, "06000");
    assert!(matches!(
        report.skip_reason("history[2]"),
        Some(SkipReason::TypeMismatch { .. })
    ));
}

#[test]
fn test_bean_to_bean() {
    let parts = Parts::new();
    let source = Value::object(Profile {
        id: 9,
        name: "grace".to_string(),
        tags: vec!["t".to_string()],
        user_name: "gh".to_string(),
        score: 1.5,
        address: Some(Address::default()),
        history: Vec::new(),
    });
    let target = Value::object(Profile::default());

    let report = parts.copy(&source, &target, CopyOptions::default()).expect("copy");
    let out = profile(&target);
    assert_eq!((out.id, out.name.as_str(), out.score), (9, "grace", 1.5));
    assert_eq!(out.tags, vec!["t".to_string()]);
    assert_eq!(report.skip_reason("display"), Some(&SkipReason::NotWritable));
}

#[test]
fn test_copy_into_map() {
    let parts = Parts::new();
    let source = Value::object(Profile {
        id: 4,
        tags: vec!["x".to_string()],
        ..Profile::default()
    });
    let target = Value::map(Vec::<(&str, Value)>::new());

    parts.copy(&source, &target, CopyOptions::default()).expect("copy");
    let map = target.as_map().expect("map");
    assert_eq!(map.get_str("id"), Some(Value::I32(4)));
    assert_eq!(map.get_str("display"), Some(Value::text(" (4)")));
    assert!(map.get_str("tags").is_some_and(|t| t.as_list().is_some()));
}

#[test]
fn test_self_copy_is_noop() {
    let parts = Parts::new();
    let value = Value::object(Profile {
        id: 1,
        ..Profile::default()
    });

    let report = parts.copy(&value, &value, CopyOptions::default()).expect("copy");
    assert!(report.copied.is_empty());
    assert_eq!(profile(&value).id, 1);
}

fn self_referencing_map() -> Value {
    let map = MapRef::new(Default::default());
    map.insert(Value::text("name"), Value::text("loop"));
    map.insert(Value::text("child"), Value::Map(map.clone()));
    Value::Map(map)
}

#[test]
fn test_cycle_skipped() {
    let parts = Parts::new();
    let to = Value::object(Node::default());

    let report = parts
        .copy(&self_referencing_map(), &to, CopyOptions::default())
        .expect("copy");
    assert_eq!(report.skip_reason("child"), Some(&SkipReason::Cycle));
    assert!(report.was_copied("name"));
    let child = to.as_object().and_then(|o| o.with(|n: &Node| n.child.clone()));
    assert_eq!(child.map(|c| c.is_some()), Some(false));
}

#[test]
fn test_cycle_as_error() {
    let parts = Parts::new();
    let to = Value::object(Node::default());
    let options = CopyOptions::default().with_cycle_policy(CyclePolicy::Error);

    match parts.copy(&self_referencing_map(), &to, options) {
        Err(MappingError::CycleDetected { path }) => assert_eq!(path, "child"),
        other => panic!("expected cycle error, got {:?}", other),
    }
}

#[test]
fn test_depth_limit() {
    let parts = Parts::new();
    let mut from = Value::map(vec![("name", Value::text("leaf"))]);
    for level in 0..5 {
        from = Value::map(vec![("name", Value::text(format!("n{}", level))), ("child", from)]);
    }
    let to = Value::object(Node::default());

    let deep = parts.copy(&from, &Value::object(Node::default()), CopyOptions::default());
    assert!(deep.is_ok());

    match parts.copy(&from, &to, CopyOptions::default().with_max_depth(3)) {
        Err(MappingError::DepthExceeded { limit, path }) => {
            assert_eq!(limit, 3);
            assert_eq!(path, "child.child.child");
        }
        other => panic!("expected depth error, got {:?}", other),
    }
}

#[test]
fn test_convert_targets() {
    let parts = Parts::new();
    let mut copier = parts.copier(CopyOptions::default());

    let list = copier
        .convert(
            &Value::list(vec![Value::text("1"), Value::I64(2)]),
            &ValueType::list_of(ValueType::Primitive(crate::PrimitiveKind::I32)),
        )
        .expect("list conversion");
    assert_eq!(list, Value::list(vec![Value::I32(1), Value::I32(2)]));

    let address = copier
        .convert(
            &Value::map(vec![("city", Value::text("Metz"))]),
            &ValueType::Object(BeanType::of::<Address>()),
        )
        .expect("bean conversion");
    assert_eq!(
        address.as_object().and_then(ObjectRef::get::<Address>).map(|a| a.city),
        Some("Metz".to_string())
    );

    assert!(matches!(
        copier.convert(&Value::I32(1), &ValueType::list_of(ValueType::Any)),
        Err(MappingError::Instantiation { .. })
    ));
}

#[test]
fn test_convert_bean_to_map() {
    let parts = Parts::new();
    let address = Value::object(Address {
        city: "Metz".to_string(),
        zip: "57000".to_string(),
    });

    let mut copier = parts.copier(CopyOptions::default());
    let converted = copier
        .convert(&address, &ValueType::map_of(ValueType::Text, ValueType::Any))
        .expect("map conversion");
    let Value::Map(map) = converted else {
        panic!("expected a map, got {:?}", converted);
    };
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Value::text("city")), Some(Value::text("Metz")));
    assert_eq!(map.get(&Value::text("zip")), Some(Value::text("57000")));

    // Values follow the declared value type; unconvertible ones are skipped
    let mut copier = parts.copier(CopyOptions::default());
    let converted = copier
        .convert(
            &address,
            &ValueType::map_of(ValueType::Text, ValueType::Primitive(crate::PrimitiveKind::I32)),
        )
        .expect("typed map conversion");
    let report = copier.finish();
    let Value::Map(map) = converted else {
        panic!("expected a map, got {:?}", converted);
    };
    assert_eq!(map.get(&Value::text("zip")), Some(Value::I32(57000)));
    assert_eq!(map.get(&Value::text("city")), None);
    assert!(report.was_copied("zip"));
    assert!(!report.was_copied("city"));
}
