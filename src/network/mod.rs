//! # 网络模块
//!
//! - `session` - 上游请求、重定向跟随和状态码检查
//! - `cache` - 净化结果的内存缓存

pub mod cache;
pub mod session;

pub use cache::{CacheStats, PageCache};
pub use session::{FetchRequest, FetchSettings, FetchedDocument, Fetcher, Session};
