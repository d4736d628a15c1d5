//! Web 模块的数据类型定义

use std::sync::Arc;

use crate::core::PurifyOptions;
use crate::network::cache::PageCache;
use crate::network::session::{FetchSettings, Fetcher};

/// 跨线程共享的上游访问器
pub type SharedFetcher = Arc<dyn Fetcher + Send + Sync>;

/// 应用状态
pub struct AppState {
    pub options: PurifyOptions,
    pub fetch: FetchSettings,
    pub cache: Option<PageCache>,
    /// 未设置时每个请求各自创建一个阻塞会话
    pub fetcher: Option<SharedFetcher>,
}

impl AppState {
    pub fn new(options: PurifyOptions, fetch: FetchSettings) -> Self {
        Self {
            options,
            fetch,
            cache: None,
            fetcher: None,
        }
    }

    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = Some(PageCache::new(capacity));
        self
    }

    pub fn with_fetcher(mut self, fetcher: SharedFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }
}
