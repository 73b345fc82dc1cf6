//! Descriptor cache implementation
//!
//! One descriptor per record type, created on first use and kept for the
//! life of the process. Lookups take a shared lock; a miss builds the
//! descriptor outside the lock and inserts it first-writer-wins, so every
//! caller ends up holding the same `Arc`.

use crate::descriptor::RecordDescriptor;
use crate::errors::DescriptorError;
use crate::record::{Params, Record, RecordType};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

static GLOBAL_CACHE: OnceLock<DescriptorCache> = OnceLock::new();

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Thread-safe map from record type to its descriptor
pub struct DescriptorCache {
    entries: RwLock<HashMap<TypeId, Arc<RecordDescriptor>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Debug for DescriptorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("DescriptorCache")
            .field("entries", &stats.entries)
            .field("hits", &stats.hits)
            .field("misses", &stats.misses)
            .finish()
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The process-wide cache, created on first access
    pub fn global() -> &'static DescriptorCache {
        GLOBAL_CACHE.get_or_init(DescriptorCache::new)
    }

    /// Return the cached descriptor for `type_id`, building it from
    /// `record_type` on a miss. Build errors are returned and not cached.
    pub fn get_or_build<F>(
        &self,
        type_id: TypeId,
        record_type: F,
    ) -> Result<Arc<RecordDescriptor>, DescriptorError>
    where
        F: FnOnce() -> RecordType,
    {
        if let Some(found) = self.get(type_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let record_type = record_type();
        let built = Arc::new(RecordDescriptor::build(&record_type)?);
        crate::debug_log!(
            "built field map for {} ({} fields)",
            record_type.name,
            built.len()
        );

        // Entries are only ever inserted whole, so a poisoned lock still guards a valid map
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(type_id).or_insert(built)))
    }

    /// Descriptor for a record type
    pub fn descriptor<R: Record>(&self) -> Result<Arc<RecordDescriptor>, DescriptorError> {
        self.get_or_build(TypeId::of::<R>(), R::record_type)
    }

    /// Descriptor for a named-parameter source
    pub fn params_descriptor<P: Params>(&self) -> Result<Arc<RecordDescriptor>, DescriptorError> {
        self.get_or_build(TypeId::of::<P>(), P::param_type)
    }

    /// Cached descriptor, without building
    pub fn get(&self, type_id: TypeId) -> Option<Arc<RecordDescriptor>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    pub fn contains<R: 'static>(&self) -> bool {
        self.get(TypeId::of::<R>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Descriptor for `R` from the process-wide cache
pub fn descriptor_for<R: Record>() -> Result<Arc<RecordDescriptor>, DescriptorError> {
    DescriptorCache::global().descriptor::<R>()
}
