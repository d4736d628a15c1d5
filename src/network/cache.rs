//! 净化结果的内存 LRU 缓存
//!
//! 以请求 URL 为键，只缓存 GET 请求的结果。

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use tracing::debug;

use crate::core::PurifiedPage;

pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// 缓存统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
}

struct Inner {
    pages: LruCache<String, PurifiedPage>,
    stats: CacheStats,
}

pub struct PageCache {
    inner: Mutex<Inner>,
}

impl PageCache {
    /// 创建新的缓存，容量为 0 时使用默认容量
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);

        PageCache {
            inner: Mutex::new(Inner {
                pages: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<PurifiedPage> {
        let mut inner = self.inner.lock().ok()?;

        match inner.pages.get(key).cloned() {
            Some(page) => {
                inner.stats.hits += 1;
                debug!("缓存命中: {}", key);
                Some(page)
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&self, key: String, page: PurifiedPage) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.pages.put(key, page);
            inner.stats.sets += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.pages.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.inner
            .lock()
            .map(|inner| inner.stats)
            .unwrap_or_default()
    }
}

impl Default for PageCache {
    fn default() -> Self {
        PageCache::new(DEFAULT_CACHE_CAPACITY)
    }
}
