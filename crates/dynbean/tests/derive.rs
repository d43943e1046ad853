// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `#[derive(Bean)]` and `#[derive(BeanEnum)]` integration tests.

use dynbean::{
    Bean, BeanEnum, BeanType, ConverterRegistry, FromValue, IntoValue, Registry, Typed, Value,
    ValueType,
};

#[derive(BeanEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Status {
    #[default]
    Active,
    Suspended,
    Closed,
}

#[derive(Bean, Debug, Clone, Default, PartialEq)]
#[bean(default, clone)]
struct Account {
    pub id: i64,
    owner: String,
    verified: bool,
    #[bean(read_only)]
    pub created: u64,
    #[bean(rename = "displayName")]
    pub display: String,
    #[bean(skip)]
    pub scratch: Vec<u8>,
    pub status: Status,
}

#[derive(Bean, Debug, Clone, Default)]
#[bean(default, clone)]
struct Holder {
    pub account: Option<Account>,
    pub accounts: Vec<Account>,
}

fn registry() -> Registry {
    Registry::builder()
        .converter(ConverterRegistry::new().with_enum::<Status>())
        .build()
}

#[test]
fn test_derived_properties() {
    let registry = registry();
    let desc = registry.describe_of::<Account>();

    let names: Vec<&str> = desc.property_names().collect();
    // Accessor-backed properties are scanned before plain fields
    assert_eq!(
        names,
        vec!["owner", "verified", "id", "created", "displayName", "status"]
    );
    assert!(!desc.has_property("scratch"));
    assert!(!desc.has_property("display"));
    assert!(desc.has_constructor());

    let owner = desc.property("owner").expect("owner");
    assert_eq!(owner.getter().map(|g| g.name()), Some("get_owner"));
    let verified = desc.property("verified").expect("verified");
    assert_eq!(verified.getter().map(|g| g.name()), Some("is_verified"));
    assert_eq!(
        desc.property("status").map(|p| p.declared().clone()),
        Some(ValueType::Enum("Status".into()))
    );
}

#[test]
fn test_private_fields_go_through_accessors() {
    let registry = registry();
    let account = Value::object(Account::default());

    assert!(registry
        .set_value(&account, "owner", Value::text("ada"), false)
        .expect("set"));
    assert!(registry
        .set_value(&account, "verified", Value::Bool(true), false)
        .expect("set"));

    assert_eq!(registry.get_value(&account, "owner").ok(), Some(Value::text("ada")));
    assert_eq!(
        registry.invoke(&account, "is_verified", Vec::new()).ok(),
        Some(Value::Bool(true))
    );
}

#[test]
fn test_read_only_needs_force() {
    let registry = registry();
    let account = Value::object(Account::default());

    let plain = registry
        .set_value(&account, "created", Value::U64(10), false)
        .expect("set");
    assert!(!plain);
    assert_eq!(registry.get_value(&account, "created").ok(), Some(Value::U64(0)));

    let forced = registry
        .set_value(&account, "created", Value::U64(10), true)
        .expect("force");
    assert!(forced);
    assert_eq!(registry.get_value(&account, "created").ok(), Some(Value::U64(10)));
}

#[test]
fn test_enum_from_text_and_ordinal() {
    let registry = registry();
    let account = Value::object(Account::default());

    assert!(registry
        .set_value(&account, "status", Value::text("suspended"), false)
        .expect("set"));
    let status = account.as_object().and_then(|o| o.with(|a: &Account| a.status));
    assert_eq!(status, Some(Status::Suspended));

    assert!(registry
        .set_value(&account, "status", Value::I32(2), false)
        .expect("set"));
    let status = account.as_object().and_then(|o| o.with(|a: &Account| a.status));
    assert_eq!(status, Some(Status::Closed));

    assert!(!registry
        .set_value(&account, "status", Value::text("Unknown"), false)
        .expect("set"));
}

#[test]
fn test_enum_bridges() {
    assert_eq!(Status::NAME, "Status");
    assert_eq!(Status::VARIANTS, &["Active", "Suspended", "Closed"]);
    assert_eq!(Status::Closed.ordinal(), 2);
    assert_eq!(Status::from_ordinal(1), Some(Status::Suspended));
    assert_eq!(Status::from_ordinal(3), None);

    let value = Status::Suspended.into_value();
    assert_eq!(Status::from_value(value), Some(Status::Suspended));
    assert_eq!(Status::value_type(), ValueType::Enum("Status".into()));
    assert_eq!(Status::from_value(Value::text("Suspended")), None);
}

#[test]
fn test_clone_attribute_duplicates_beans() {
    let registry = registry();
    let original = Value::object(Account {
        id: 1,
        owner: "ada".to_string(),
        ..Account::default()
    });

    let copy = registry.duplicate(&original).expect("duplicate");
    assert!(!copy.same_instance(&original));
    assert_eq!(
        Account::from_value(copy),
        Account::from_value(original.clone())
    );
    assert_eq!(Account::value_type(), ValueType::Object(BeanType::of::<Account>()));
}

#[test]
fn test_nested_maps_become_beans() {
    let registry = registry();
    let holder = Value::object(Holder::default());
    let from = Value::map(vec![
        (
            "account",
            Value::map(vec![("id", Value::I64(7)), ("owner", Value::text("ada"))]),
        ),
        (
            "accounts",
            Value::list(vec![
                Value::map(vec![("id", Value::I64(1))]),
                Value::map(vec![("id", Value::I64(2))]),
            ]),
        ),
    ]);

    let report = registry
        .copy_properties_report(&from, &holder, registry.copy_defaults())
        .expect("copy");
    assert!(report.was_copied("account"));
    assert!(report.was_copied("accounts"));

    let nested = holder
        .as_object()
        .and_then(|o| o.with(|h: &Holder| h.account.clone()))
        .flatten()
        .expect("nested account");
    assert_eq!(nested.id, 7);
    assert_eq!(nested.owner, "ada");

    let ids = holder
        .as_object()
        .and_then(|o| o.with(|h: &Holder| h.accounts.iter().map(|a| a.id).collect::<Vec<_>>()));
    assert_eq!(ids, Some(vec![1, 2]));
}
