//! # 解析器模块
//!
//! - `html` - HTML文档解析、白名单过滤、元数据处理
//! - `link_rewriter` - 将链接重写为经由代理入口的地址
//! - `form_rewriter` - 将表单重定向到代理的表单端点

pub mod form_rewriter;
pub mod html;
pub mod link_rewriter;

pub use form_rewriter::rewrite_form;
pub use html::{
    augment_head, collapse_lists, get_base_url, get_charset, get_title, html_to_dom,
    serialize_document, Purifier, TagPolicy,
};
pub use link_rewriter::rewrite_link;
