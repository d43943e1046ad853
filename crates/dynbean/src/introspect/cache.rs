// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent descriptor cache.
//!
//! Describing a type runs its registration and scans it; the cache makes
//! sure that happens once per type. Two policies:
//!
//! - **Unbounded**: a `DashMap` that never evicts. Concurrent first
//!   lookups may each build a descriptor, but only the first completed
//!   insert is published; the others are dropped and every caller gets the
//!   published instance.
//! - **Bounded**: an LRU guarded by a `RwLock`, for processes that describe
//!   many short-lived types. Pinned types are never evicted. An evicted
//!   type is rebuilt on its next lookup, so reference stability only holds
//!   while a type stays cached.

use crate::config::CachePolicy;
use crate::introspect::TypeDescriptor;
use crate::value::BeanType;
use dashmap::{DashMap, DashSet};
use lru::LruCache;
use parking_lot::RwLock;
use std::any::TypeId;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Snapshot of the cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub last_miss_ns: u64,
}

/// Live counters. Lookups only touch atomics.
#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    last_miss_ns: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> LookupStats {
        LookupStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            last_miss_ns: self.last_miss_ns.load(Ordering::Relaxed),
        }
    }
}

enum Store {
    Unbounded(DashMap<TypeId, Arc<TypeDescriptor>>),
    Bounded {
        inner: RwLock<LruCache<TypeId, Arc<TypeDescriptor>>>,
        pinned: DashSet<TypeId>,
    },
}

/// Descriptor cache keyed by bean type.
pub struct DescriptorCache {
    store: Store,
    stats: Counters,
}

impl DescriptorCache {
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        let store = match policy {
            CachePolicy::Unbounded => Store::Unbounded(DashMap::new()),
            CachePolicy::Bounded { capacity } => Store::Bounded {
                inner: RwLock::new(LruCache::new(capacity)),
                pinned: DashSet::new(),
            },
        };
        Self {
            store,
            stats: Counters::default(),
        }
    }

    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(CachePolicy::Unbounded)
    }

    #[must_use]
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::new(CachePolicy::Bounded { capacity })
    }

    /// Cached descriptor for `bean_type`, building it on first use.
    pub fn get_or_build(&self, bean_type: BeanType) -> Arc<TypeDescriptor> {
        let key = bean_type.id();
        match &self.store {
            Store::Unbounded(map) => {
                if let Some(hit) = map.get(&key) {
                    self.record_hit();
                    return Arc::clone(hit.value());
                }

                let start = Instant::now();
                let built = Arc::new(bean_type.build());
                let winner = Arc::clone(map.entry(key).or_insert(built).value());
                self.record_miss(start);
                winner
            }
            Store::Bounded { inner, pinned } => {
                if let Some(hit) = inner.read().peek(&key).map(Arc::clone) {
                    self.record_hit();
                    return hit;
                }

                let mut cache = inner.write();
                if let Some(hit) = cache.get(&key) {
                    self.record_hit();
                    return Arc::clone(hit);
                }

                let start = Instant::now();
                let built = Arc::new(bean_type.build());
                if cache.len() >= cache.cap().get() && !self.free_slot(&mut cache, pinned) {
                    // Everything is pinned: serve the descriptor uncached.
                    log::debug!(
                        "[introspect] cache full of pinned types, {} left uncached",
                        bean_type.short_name()
                    );
                    self.record_miss(start);
                    return built;
                }
                cache.put(key, Arc::clone(&built));
                self.record_miss(start);
                built
            }
        }
    }

    /// Cached descriptor without building.
    pub fn peek(&self, bean_type: BeanType) -> Option<Arc<TypeDescriptor>> {
        let key = bean_type.id();
        match &self.store {
            Store::Unbounded(map) => map.get(&key).map(|hit| Arc::clone(hit.value())),
            Store::Bounded { inner, .. } => inner.read().peek(&key).map(Arc::clone),
        }
    }

    /// Never evict `bean_type` from a bounded cache. No-op when unbounded.
    pub fn pin(&self, bean_type: BeanType) {
        if let Store::Bounded { pinned, .. } = &self.store {
            pinned.insert(bean_type.id());
        }
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Unbounded(map) => map.len(),
            Store::Bounded { inner, .. } => inner.read().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        self.stats.snapshot()
    }

    fn free_slot(
        &self,
        cache: &mut LruCache<TypeId, Arc<TypeDescriptor>>,
        pinned: &DashSet<TypeId>,
    ) -> bool {
        let attempts = cache.len();
        for _ in 0..attempts {
            let Some((old_key, old_value)) = cache.pop_lru() else {
                break;
            };
            if pinned.contains(&old_key) {
                // Re-inserted as most recently used; keep looking.
                cache.put(old_key, old_value);
            } else {
                log::debug!("[introspect] evicted {}", old_value.name());
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    fn record_hit(&self) {
        self.stats.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self, start: Instant) {
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.stats.last_miss_ns.store(elapsed, Ordering::Relaxed);
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
