//! 链接重写模块
//!
//! 将保留下来的锚点重写为经由代理入口的地址，使得点击后的页面同样被净化。

use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::core::{RequestContext, WebOneError};
use crate::parsers::html::{get_node_attr, set_node_attr};
use crate::utils::url::{is_http_url, proxy_url, resolve_reference};

/// 重写锚点的 href 属性
///
/// 相对引用按请求上下文中的基础 URL 解析。解析失败时返回
/// `MalformedReference`，整个文档随之中止。没有 href 的锚点保持不变。
pub fn rewrite_link(node: &Handle, context: &RequestContext) -> Result<(), WebOneError> {
    let Some(href_value) = get_node_attr(node, "href") else {
        return Ok(());
    };

    let absolute_url = resolve_reference(context.base_url(), &href_value)?;

    // mailto:、javascript: 等链接无法经由代理访问
    if !is_http_url(&absolute_url) {
        debug!("不代理非 HTTP 链接: {}", absolute_url.scheme());
        set_node_attr(node, "href", Some(absolute_url.to_string()));
        return Ok(());
    }

    set_node_attr(
        node,
        "href",
        Some(proxy_url(context.routes(), &absolute_url)),
    );

    Ok(())
}
