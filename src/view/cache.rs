use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::algebra::permutation::Permutation;
use crate::foundation::core::Dimensions;
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::foundation::math::IdentityBytes;
use crate::mapping::Mapping;
use crate::view::index_map::{PixelIndexMap, build_pixel_index_map};
use crate::view::mask::ViewMask;
use crate::view::stage::TransformStage;

/// Key of the process-wide cache: canvas shape plus the identity of mapping and mask.
///
/// Keys compare on the full canonical encoding of mapping and mask; the 64-bit identity is
/// only used for hashing, so a collision can never share the wrong map.
#[derive(Clone, Debug)]
pub struct ViewKey {
    /// Canvas shape the map was built for.
    pub dims: Dimensions,
    /// Hash of the mapping family, its parameters and the mask.
    pub identity: u64,
    encoding: Arc<[u8]>,
}

impl ViewKey {
    /// Key for `mapping` restricted by `mask` at `dims`.
    pub fn new(dims: Dimensions, mapping: &Mapping, mask: &ViewMask) -> Self {
        let mut bytes = IdentityBytes::new();
        mapping.write_identity(&mut bytes);
        mask.write_identity(&mut bytes);
        Self {
            dims,
            identity: bytes.hash(),
            encoding: bytes.into_bytes().into(),
        }
    }
}

impl PartialEq for ViewKey {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims
            && self.identity == other.identity
            && self.encoding == other.encoding
    }
}

impl Eq for ViewKey {}

impl Hash for ViewKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dims.hash(state);
        self.identity.hash(state);
    }
}

/// Build-once map store. Lookups take the read lock; misses retake the write lock and check
/// again before building, so a key is built at most once.
#[derive(Debug)]
struct KeyedCache<K> {
    maps: RwLock<HashMap<K, Arc<PixelIndexMap>>>,
    builds: AtomicU64,
}

impl<K> Default for KeyedCache<K> {
    fn default() -> Self {
        Self {
            maps: RwLock::new(HashMap::new()),
            builds: AtomicU64::new(0),
        }
    }
}

impl<K: Eq + Hash> KeyedCache<K> {
    fn get_or_build(
        &self,
        key: K,
        build: impl FnOnce() -> SymmetraResult<PixelIndexMap>,
    ) -> SymmetraResult<Arc<PixelIndexMap>> {
        {
            let maps = self.maps.read().map_err(|_| poisoned())?;
            if let Some(map) = maps.get(&key) {
                return Ok(Arc::clone(map));
            }
        }

        let mut maps = self.maps.write().map_err(|_| poisoned())?;
        if let Some(map) = maps.get(&key) {
            return Ok(Arc::clone(map));
        }
        let map = Arc::new(build()?);
        self.builds.fetch_add(1, Ordering::Relaxed);
        maps.insert(key, Arc::clone(&map));
        Ok(map)
    }

    fn len(&self) -> SymmetraResult<usize> {
        Ok(self.maps.read().map_err(|_| poisoned())?.len())
    }

    fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }
}

fn poisoned() -> SymmetraError {
    SymmetraError::evaluation("view cache lock poisoned")
}

/// Process-wide pixel index map cache.
///
/// Create one and hand out `Arc<ViewCache>` clones to every [`View`] that should share maps.
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct ViewCache {
    inner: KeyedCache<ViewKey>,
}

impl ViewCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached map for `mapping`/`mask` at `dims`, building it on first use.
    pub fn get_or_build(
        &self,
        dims: Dimensions,
        mapping: &Mapping,
        mask: &ViewMask,
    ) -> SymmetraResult<Arc<PixelIndexMap>> {
        let key = ViewKey::new(dims, mapping, mask);
        let identity = key.identity;
        self.inner.get_or_build(key, || {
            tracing::debug!(?dims, identity, "view cache miss");
            build_pixel_index_map(dims, mapping, mask)
        })
    }

    /// Number of cached maps. Fails if a builder panicked while holding the lock.
    pub fn len(&self) -> SymmetraResult<usize> {
        self.inner.len()
    }

    /// `true` when nothing has been cached yet.
    pub fn is_empty(&self) -> SymmetraResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Total number of maps built (each miss counts once).
    pub fn builds(&self) -> u64 {
        self.inner.builds()
    }
}

/// Where a [`View`] keeps its maps.
#[derive(Clone, Debug, Default)]
pub enum CacheScope {
    /// Private to the view, keyed by canvas shape only.
    #[default]
    Instance,
    /// Shared process-wide service.
    Global(Arc<ViewCache>),
}

/// A mapping, an output mask and an optional channel permutation, ready to be turned into
/// transform stages at any canvas size.
#[derive(Debug)]
pub struct View {
    mapping: Mapping,
    mask: ViewMask,
    channels: Option<Permutation>,
    scope: CacheScope,
    local: KeyedCache<Dimensions>,
}

impl View {
    /// View over `mapping` with the default mask and an instance-local cache.
    pub fn new(mapping: Mapping) -> SymmetraResult<Self> {
        mapping.validate()?;
        Ok(Self {
            mapping,
            mask: ViewMask::default(),
            channels: None,
            scope: CacheScope::Instance,
            local: KeyedCache::default(),
        })
    }

    /// Restrict the mapping output to `mask`.
    pub fn with_mask(mut self, mask: ViewMask) -> SymmetraResult<Self> {
        mask.validate()?;
        self.mask = mask;
        Ok(self)
    }

    /// Permute channels of every sampled pixel.
    pub fn with_channels(mut self, channels: Permutation) -> Self {
        self.channels = (!channels.is_unity()).then_some(channels);
        self
    }

    /// Look maps up in the shared `cache` instead of a private one.
    pub fn shared(mut self, cache: Arc<ViewCache>) -> Self {
        self.scope = CacheScope::Global(cache);
        self
    }

    /// The mapping.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// The output mask.
    pub fn mask(&self) -> &ViewMask {
        &self.mask
    }

    /// The channel permutation, if any.
    pub fn channels(&self) -> Option<&Permutation> {
        self.channels.as_ref()
    }

    /// The cache this view reads through.
    pub fn scope(&self) -> &CacheScope {
        &self.scope
    }

    /// Global cache key for this view at `dims`.
    pub fn key(&self, dims: Dimensions) -> ViewKey {
        ViewKey::new(dims, &self.mapping, &self.mask)
    }

    /// Pixel index map at `dims`, from this view's cache.
    pub fn index_map(&self, dims: Dimensions) -> SymmetraResult<Arc<PixelIndexMap>> {
        let dims = dims.validate()?;
        match &self.scope {
            CacheScope::Instance => self
                .local
                .get_or_build(dims, || build_pixel_index_map(dims, &self.mapping, &self.mask)),
            CacheScope::Global(cache) => cache.get_or_build(dims, &self.mapping, &self.mask),
        }
    }

    /// Maps built by this view's private cache.
    pub fn local_builds(&self) -> u64 {
        self.local.builds()
    }

    /// Transform stage for a `dims` canvas.
    #[tracing::instrument(skip(self))]
    pub fn get_view(&self, dims: Dimensions) -> SymmetraResult<TransformStage> {
        let map = self.index_map(dims)?;
        TransformStage::new(dims, map, self.channels.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/cache.rs"]
mod tests;
