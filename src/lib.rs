//! # WebOne
//!
//! 为老旧浏览器和慢速网络净化网页的代理。
//! 上游页面经过白名单过滤后，链接与表单被改写为经由代理访问，
//! 最终输出精简的 UTF-8 HTML。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型、净化选项和主要处理流程
//! - `parsers` - HTML 解析、白名单过滤、链接与表单重写
//! - `network` - 上游请求与净化结果缓存
//! - `utils` - URL 规范化与编码
//! - `env` - 类型安全的环境变量配置
//! - `web` - Web服务器功能（可选）

pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod utils;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use crate::core::{
    purify_document_from_data, purify_target, ProxyRoutes, PurifiedPage, PurifyOptions,
    RequestContext, WebOneError,
};
pub use crate::network::{FetchRequest, FetchSettings, FetchedDocument, Fetcher, PageCache, Session};
pub use crate::parsers::{Purifier, TagPolicy};
