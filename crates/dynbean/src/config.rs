// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration - defaults and runtime options.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: compile-time defaults below.
//! - **Level 2 (Dynamic)**: [`RegistryConfig`], chosen when a
//!   [`Registry`](crate::Registry) is built. Default copy options can be
//!   swapped at runtime afterwards (see `Registry::set_copy_defaults`).
//!
//! With the `config-loaders` feature, a configuration can be read from YAML:
//!
//! ```yaml
//! cache:
//!   bounded: 256        # or: cache: unbounded
//! copy:
//!   case_insensitive: true
//!   max_depth: 32
//!   on_cycle: error     # or: skip
//!   map_nested: true
//! ```

use std::num::NonZeroUsize;

/// Maximum nesting depth of a graph copy before it is aborted.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default capacity of a bounded descriptor cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Descriptor cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Never evict (process-lifetime cache).
    #[default]
    Unbounded,
    /// LRU eviction beyond `capacity` descriptors.
    Bounded { capacity: NonZeroUsize },
}

impl CachePolicy {
    /// Bounded cache with [`DEFAULT_CACHE_CAPACITY`].
    #[must_use]
    pub fn bounded_default() -> Self {
        Self::Bounded {
            capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// What a graph copy does when it meets a container or bean that is
/// already on the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config-loaders",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CyclePolicy {
    /// Leave the property unset and record it as skipped.
    #[default]
    Skip,
    /// Abort with [`MappingError::CycleDetected`](crate::MappingError).
    Error,
}

/// Options of a property copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize), serde(default))]
pub struct CopyOptions {
    /// Resolve target names case/underscore-insensitively.
    pub case_insensitive: bool,
    /// Nesting limit; deeper graphs fail with `DepthExceeded`.
    pub max_depth: usize,
    pub on_cycle: CyclePolicy,
    /// Copy a map or bean into a property declared as another bean type by
    /// instantiating the target type and copying recursively.
    pub map_nested: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            max_depth: DEFAULT_MAX_DEPTH,
            on_cycle: CyclePolicy::Skip,
            map_nested: true,
        }
    }
}

impl CopyOptions {
    /// Default options with case-insensitive name matching.
    #[must_use]
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_cycle_policy(mut self, on_cycle: CyclePolicy) -> Self {
        self.on_cycle = on_cycle;
        self
    }
}

/// Registry construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    pub cache: CachePolicy,
    pub copy: CopyOptions,
}

#[cfg(feature = "config-loaders")]
mod loader {
    use super::{CachePolicy, CopyOptions, RegistryConfig};
    use serde::Deserialize;
    use std::fmt;
    use std::num::NonZeroUsize;

    /// Configuration loading errors.
    #[derive(Debug)]
    pub enum ConfigError {
        Yaml(serde_yaml::Error),
        Io(std::io::Error),
    }

    impl fmt::Display for ConfigError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Yaml(e) => write!(f, "Invalid registry config: {}", e),
                Self::Io(e) => write!(f, "Cannot read registry config: {}", e),
            }
        }
    }

    impl std::error::Error for ConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Self::Yaml(e) => Some(e),
                Self::Io(e) => Some(e),
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum RawCache {
        Unbounded,
        Bounded(NonZeroUsize),
    }

    #[derive(Deserialize)]
    struct RawConfig {
        cache: Option<RawCache>,
        #[serde(default)]
        copy: CopyOptions,
    }

    impl RegistryConfig {
        /// Parse a YAML document.
        pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
            let raw: RawConfig = serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)?;
            let cache = match raw.cache {
                None | Some(RawCache::Unbounded) => CachePolicy::Unbounded,
                Some(RawCache::Bounded(capacity)) => CachePolicy::Bounded { capacity },
            };
            Ok(Self {
                cache,
                copy: raw.copy,
            })
        }

        /// Read and parse a YAML file.
        pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
            let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
            Self::from_yaml_str(&text)
        }
    }
}

#[cfg(feature = "config-loaders")]
pub use loader::ConfigError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.cache, CachePolicy::Unbounded);
        assert_eq!(config.copy.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.copy.case_insensitive);
        assert!(config.copy.map_nested);
    }

    #[test]
    fn test_bounded_default_capacity() {
        match CachePolicy::bounded_default() {
            CachePolicy::Bounded { capacity } => {
                assert_eq!(capacity.get(), DEFAULT_CACHE_CAPACITY)
            }
            CachePolicy::Unbounded => panic!("expected bounded policy"),
        }
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_from_yaml() {
        let yaml = "cache:\n  bounded: 16\ncopy:\n  case_insensitive: true\n  on_cycle: error\n";
        let config = RegistryConfig::from_yaml_str(yaml).expect("valid yaml");

        assert_eq!(
            config.cache,
            CachePolicy::Bounded {
                capacity: NonZeroUsize::new(16).expect("non-zero")
            }
        );
        assert!(config.copy.case_insensitive);
        assert_eq!(config.copy.on_cycle, CyclePolicy::Error);
        assert_eq!(config.copy.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_from_yaml_unbounded_and_empty() {
        let config = RegistryConfig::from_yaml_str("cache: unbounded\n").expect("valid yaml");
        assert_eq!(config.cache, CachePolicy::Unbounded);
        assert_eq!(config.copy, CopyOptions::default());
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_from_yaml_rejects_zero_capacity() {
        assert!(RegistryConfig::from_yaml_str("cache:\n  bounded: 0\n").is_err());
    }
}
