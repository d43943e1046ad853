// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property naming: accessor-name conventions and the case/underscore
//! insensitive alias table.

use std::collections::HashMap;

/// Zero-argument methods that look like getters but are never properties.
const GETTER_DENY_LIST: &[&str] = &["getClass", "get_class", "get_type_id", "getTypeId"];

/// Normalized lookup key: lowercase with underscores removed.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase the first character unless the first two are both uppercase
/// (`"Name"` -> `"name"`, `"URL"` -> `"URL"`).
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }
    first.to_lowercase().chain(name.chars().skip(1)).collect()
}

/// Strip an accessor prefix, accepting both `get_name` and `getName`.
fn strip_accessor_prefix(method: &str, prefix: &str) -> Option<String> {
    let rest = method.strip_prefix(prefix)?;
    if let Some(snake) = rest.strip_prefix('_') {
        return (!snake.is_empty()).then(|| snake.to_string());
    }
    let first = rest.chars().next()?;
    first.is_uppercase().then(|| decapitalize(rest))
}

/// Property name of a getter method (`getX`, `get_x`), if it is one.
pub fn getter_property(method: &str) -> Option<String> {
    if GETTER_DENY_LIST.contains(&method) {
        return None;
    }
    strip_accessor_prefix(method, "get")
}

/// Property name of a boolean getter method (`isX`, `is_x`), if it is one.
pub fn bool_getter_property(method: &str) -> Option<String> {
    strip_accessor_prefix(method, "is")
}

/// Property name of a setter method (`setX`, `set_x`), if it is one.
pub fn setter_property(method: &str) -> Option<String> {
    strip_accessor_prefix(method, "set")
}

/// Alias table mapping normalized spellings to canonical property names.
///
/// Built once while a type is described; lookups never normalize more than
/// the probe itself.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    aliases: HashMap<String, String>,
}

impl NameResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `canonical` under its own normalized spelling. The first
    /// name registered for a normalized key keeps it.
    pub fn register(&mut self, canonical: &str) {
        self.aliases
            .entry(normalize(canonical))
            .or_insert_with(|| canonical.to_string());
    }

    /// Canonical property name for any case/underscore variant of it.
    pub fn canonicalize(&self, alias: &str) -> Option<&str> {
        self.aliases.get(&normalize(alias)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("USER_NAME"), "username");
        assert_eq!(normalize("userName"), "username");
        assert_eq!(normalize("user_name"), "username");
    }

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize("UserName"), "userName");
        assert_eq!(decapitalize("URL"), "URL");
        assert_eq!(decapitalize("X"), "x");
        assert_eq!(decapitalize(""), "");
    }

    #[test]
    fn test_getter_conventions() {
        assert_eq!(getter_property("getUserName").as_deref(), Some("userName"));
        assert_eq!(getter_property("get_user_name").as_deref(), Some("user_name"));
        assert_eq!(getter_property("getaway"), None);
        assert_eq!(getter_property("get"), None);
        assert_eq!(getter_property("get_"), None);
        assert_eq!(getter_property("getClass"), None);
        assert_eq!(bool_getter_property("isActive").as_deref(), Some("active"));
        assert_eq!(setter_property("set_age").as_deref(), Some("age"));
        assert_eq!(setter_property("settle"), None);
    }

    #[test]
    fn test_resolver_first_registration_wins() {
        let mut resolver = NameResolver::new();
        resolver.register("userName");
        resolver.register("user_name");

        assert_eq!(resolver.canonicalize("USER_NAME"), Some("userName"));
        assert_eq!(resolver.canonicalize("UserName"), Some("userName"));
        assert_eq!(resolver.canonicalize("email"), None);
        assert_eq!(resolver.len(), 1);
    }
}
