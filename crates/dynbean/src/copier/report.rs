// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Copy diagnostics.

use std::fmt;

/// Why a source property was not copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The target has no property of that name.
    NoTarget,
    /// The target property has no setter and no writable field.
    NotWritable,
    /// Null offered to a primitive property.
    NullToPrimitive,
    /// No setter accepted the value and it did not convert.
    TypeMismatch { expected: String, got: String },
    /// The value was already on the copy path.
    Cycle,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTarget => write!(f, "no target property"),
            Self::NotWritable => write!(f, "target not writable"),
            Self::NullToPrimitive => write!(f, "null into primitive"),
            Self::TypeMismatch { expected, got } => {
                write!(f, "expected {}, got {}", expected, got)
            }
            Self::Cycle => write!(f, "cycle"),
        }
    }
}

/// One skipped property, by dotted path (`address.city`, `tags[2]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub reason: SkipReason,
}

/// What a property copy did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Paths of the properties that were assigned.
    pub copied: Vec<String>,
    pub skipped: Vec<Skipped>,
}

impl CopyReport {
    /// Nothing was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn was_copied(&self, name: &str) -> bool {
        self.copied.iter().any(|c| c == name)
    }

    /// Reason `name` was skipped, if it was.
    pub fn skip_reason(&self, name: &str) -> Option<&SkipReason> {
        self.skipped.iter().find(|s| s.name == name).map(|s| &s.reason)
    }

    pub(crate) fn copied(&mut self, name: String) {
        self.copied.push(name);
    }

    pub(crate) fn skip(&mut self, name: String, reason: SkipReason) {
        log::debug!("[copy] skipped {}: {}", name, reason);
        self.skipped.push(Skipped { name, reason });
    }
}
