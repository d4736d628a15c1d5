//! # 工具模块
//!
//! - `url` - 目标地址规范化、引用解析、代理地址编码

pub mod url;

pub use url::{
    encode_query_component, is_http_url, normalize_target, proxy_url, resolve_reference,
    source_from_referer, Url, ORIGIN_ACTION_FIELD, ORIGIN_METHOD_FIELD,
};
