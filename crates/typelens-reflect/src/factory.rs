use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use typelens_types::{TypeHandle, TypeUniverse};

use crate::Result;
use crate::metadata::TypeMetadata;
use crate::reflector::{Reflector, ReflectorConfig};

/// Process-wide cache of [`TypeMetadata`], one record per type.
///
/// Records are built outside the map's locks. When two threads race on the
/// same type both build, the first insert wins and every caller gets the
/// winning record. Failed builds are not cached.
pub struct ReflectorFactory {
    universe: Arc<TypeUniverse>,
    config: ReflectorConfig,
    cache: DashMap<TypeHandle, Arc<TypeMetadata>>,
    cache_enabled: AtomicBool,
}

impl ReflectorFactory {
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        Self::with_config(universe, ReflectorConfig::default())
    }

    pub fn with_config(universe: Arc<TypeUniverse>, config: ReflectorConfig) -> Self {
        Self {
            universe,
            config,
            cache: DashMap::new(),
            cache_enabled: AtomicBool::new(true),
        }
    }

    pub fn universe(&self) -> &Arc<TypeUniverse> {
        &self.universe
    }

    pub fn config(&self) -> ReflectorConfig {
        self.config
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled.load(Ordering::Relaxed)
    }

    /// Turn caching on or off. Records already cached stay cached.
    pub fn set_cache_enabled(&self, enabled: bool) {
        self.cache_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Number of cached records.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Metadata for `handle`, built on first request.
    pub fn metadata(&self, handle: TypeHandle) -> Result<Arc<TypeMetadata>> {
        if !self.is_cache_enabled() {
            return self.build(handle).map(Arc::new);
        }

        if let Some(hit) = self.cache.get(&handle) {
            log::debug!("metadata cache hit for {}", hit.type_name());
            return Ok(Arc::clone(hit.value()));
        }

        let built = Arc::new(self.build(handle)?);
        let entry = self
            .cache
            .entry(handle)
            .or_insert_with(|| Arc::clone(&built));
        if !Arc::ptr_eq(entry.value(), &built) {
            log::warn!(
                "discarding duplicate metadata for {} built concurrently",
                built.type_name()
            );
        }
        Ok(Arc::clone(entry.value()))
    }

    fn build(&self, handle: TypeHandle) -> Result<TypeMetadata> {
        log::debug!("building metadata for {}", self.universe.name(handle));
        Reflector::new(&self.universe, self.config).build(handle)
    }
}
