// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hard failures.
//!
//! Soft failures (unknown property, no setter for a value's type,
//! unconvertible scalar) never surface here: they are reported as `false`,
//! `None` or a [`crate::CopyReport`] entry. Everything in [`MappingError`]
//! is unexpected and always carries the type and member it concerns.

use std::error::Error;
use std::fmt;

/// Boxed cause carried by hard failures.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Invocation and instantiation faults.
#[derive(Debug)]
pub enum MappingError {
    /// A getter, setter, field accessor or method raised a fault.
    Invocation {
        type_name: &'static str,
        member: String,
        source: BoxError,
    },
    /// A type could not be instantiated (no constructor registered, or the
    /// constructor failed).
    Instantiation {
        type_name: String,
        reason: String,
        source: Option<BoxError>,
    },
    /// No registered overload accepts the arguments.
    NoMatchingMethod {
        type_name: &'static str,
        method: String,
        arg_types: Vec<String>,
    },
    /// The value is not a bean instance.
    NotABean { got: String },
    /// A copy revisited a container or bean already on the current path.
    CycleDetected { path: String },
    /// A copy went deeper than the configured limit.
    DepthExceeded { limit: usize, path: String },
}

impl MappingError {
    pub(crate) fn invocation(
        type_name: &'static str,
        member: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Invocation {
            type_name,
            member: member.into(),
            source: source.into(),
        }
    }

    pub(crate) fn instantiation(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Instantiation {
            type_name: type_name.into(),
            reason: reason.into(),
            source: None,
        }
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invocation {
                type_name,
                member,
                source,
            } => write!(f, "Invocation fault in {}::{}: {}", type_name, member, source),
            Self::Instantiation {
                type_name, reason, ..
            } => write!(f, "Cannot instantiate {}: {}", type_name, reason),
            Self::NoMatchingMethod {
                type_name,
                method,
                arg_types,
            } => write!(
                f,
                "No matching method {}::{}({})",
                type_name,
                method,
                arg_types.join(", ")
            ),
            Self::NotABean { got } => write!(f, "Not a bean instance: {}", got),
            Self::CycleDetected { path } => write!(f, "Cycle detected at {}", path),
            Self::DepthExceeded { limit, path } => {
                write!(f, "Copy depth exceeds {} at {}", limit, path)
            }
        }
    }
}

impl Error for MappingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invocation { source, .. } => Some(source.as_ref()),
            Self::Instantiation {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Scalar conversion failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The target type is not handled by the converter.
    Unsupported { from: String, to: String },
    /// The source text does not parse as the target type.
    Parse { input: String, to: String },
    /// The number does not fit in the target type.
    OutOfRange { value: String, to: String },
    /// Null cannot be stored in a non-nullable target.
    NullToPrimitive { to: String },
    /// No enum variant matches the name or ordinal.
    UnknownVariant { enum_name: String, input: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { from, to } => write!(f, "Cannot convert {} to {}", from, to),
            Self::Parse { input, to } => write!(f, "Cannot parse {:?} as {}", input, to),
            Self::OutOfRange { value, to } => write!(f, "{} is out of range for {}", value, to),
            Self::NullToPrimitive { to } => write!(f, "Cannot store null in {}", to),
            Self::UnknownVariant { enum_name, input } => {
                write!(f, "{} has no variant {:?}", enum_name, input)
            }
        }
    }
}

impl Error for ConvertError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_keeps_cause() {
        let cause = ConvertError::NullToPrimitive {
            to: "i32".to_string(),
        };
        let err = MappingError::invocation("demo::User", "set_age", cause);

        assert_eq!(
            err.to_string(),
            "Invocation fault in demo::User::set_age: Cannot store null in i32"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_no_matching_method_lists_arguments() {
        let err = MappingError::NoMatchingMethod {
            type_name: "Calc",
            method: "add".to_string(),
            arg_types: vec!["text".to_string(), "Option<i32>".to_string()],
        };
        assert_eq!(err.to_string(), "No matching method Calc::add(text, Option<i32>)");
    }
}
