//! LRU cache for rasterized pages

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::scale::RenderScale;
use super::types::PageData;

/// Cache key for rendered pages
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Page number (1-indexed)
    pub page: usize,
    /// Surface width in pixels
    pub width_px: u32,
    /// Surface height in pixels
    pub height_px: u32,
    /// Raster scale (stored as millionths for stable hashing)
    pub scale_millionths: u32,
}

impl CacheKey {
    #[must_use]
    pub fn new(page: usize, scale: &RenderScale) -> Self {
        Self {
            page,
            width_px: scale.width_px,
            height_px: scale.height_px,
            scale_millionths: (scale.raster_scale * 1_000_000.0) as u32,
        }
    }
}

/// LRU cache for rendered page data
pub struct PageCache {
    cache: LruCache<CacheKey, Arc<PageData>>,
}

impl PageCache {
    /// Create a new cache with the given capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Get a cached page, promoting it in the LRU order
    #[must_use]
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<PageData>> {
        self.cache.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cache.contains(key)
    }

    /// Insert a page into the cache, returning an Arc to the data
    pub fn insert(&mut self, key: CacheKey, data: PageData) -> Arc<PageData> {
        let arc = Arc::new(data);
        self.cache.put(key, arc.clone());
        arc
    }

    /// Clear all cached pages
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::RasterImage;
    use super::*;

    fn test_scale(width_px: u32) -> RenderScale {
        RenderScale {
            scale: 0.1,
            raster_scale: 0.1,
            width_px,
            height_px: 20,
        }
    }

    fn test_page_data(page: usize) -> PageData {
        PageData {
            page,
            scale: 0.1,
            image: RasterImage {
                pixels: vec![0; 10 * 20 * 4],
                width_px: 10,
                height_px: 20,
            },
        }
    }

    #[test]
    fn cache_insert_and_get() {
        let mut cache = PageCache::new(10);
        let key = CacheKey::new(1, &test_scale(10));

        cache.insert(key.clone(), test_page_data(1));

        assert!(cache.contains(&key));
        assert!(cache.get(&key).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_lru_eviction() {
        let mut cache = PageCache::new(2);
        let scale = test_scale(10);

        for page in 1..=3 {
            cache.insert(CacheKey::new(page, &scale), test_page_data(page));
        }

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&CacheKey::new(1, &scale)));
        assert!(cache.contains(&CacheKey::new(2, &scale)));
        assert!(cache.contains(&CacheKey::new(3, &scale)));
    }

    #[test]
    fn different_geometry_is_a_different_entry() {
        let mut cache = PageCache::new(10);
        cache.insert(CacheKey::new(1, &test_scale(10)), test_page_data(1));

        assert!(!cache.contains(&CacheKey::new(1, &test_scale(12))));
    }

    #[test]
    fn cache_invalidate_all() {
        let mut cache = PageCache::new(10);
        let scale = test_scale(10);

        for page in 1..=5 {
            cache.insert(CacheKey::new(page, &scale), test_page_data(page));
        }

        assert_eq!(cache.len(), 5);
        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_falls_back_to_one() {
        let mut cache = PageCache::new(0);
        let scale = test_scale(10);
        cache.insert(CacheKey::new(1, &scale), test_page_data(1));
        cache.insert(CacheKey::new(2, &scale), test_page_data(2));
        assert_eq!(cache.len(), 1);
    }
}
