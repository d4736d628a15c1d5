use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub use url::Url;

use crate::core::{ProxyRoutes, WebOneError};

/// 隐藏字段：表单原始的 action
pub const ORIGIN_ACTION_FIELD: &str = "origin_action";
/// 隐藏字段：表单原始的 method
pub const ORIGIN_METHOD_FIELD: &str = "origin_method";

/// Everything except unreserved characters gets percent-encoded,
/// so that a whole URL fits into a single query parameter
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// 将用户提交的目标地址规范化为绝对的 HTTP(S) URL
///
/// 没有协议的地址（例如 `example.com/page`）默认使用 `http://`。
pub fn normalize_target(target: &str) -> Result<Url, WebOneError> {
    let target = target.trim();

    if target.is_empty() {
        return Err(WebOneError::InvalidTarget {
            target: target.to_string(),
            message: "empty target".to_string(),
        });
    }

    let parsed = match Url::parse(target) {
        Ok(url) if is_http_url(&url) || target.contains("://") => Ok(url),
        // 没有协议，"localhost:8080" 这类地址会被误认为协议
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("http://{}", target.trim_start_matches('/')))
        }
        Err(e) => Err(e),
    };

    match parsed {
        Ok(url) if is_http_url(&url) && url.has_host() => Ok(url),
        Ok(url) => Err(WebOneError::InvalidTarget {
            target: target.to_string(),
            message: format!("unsupported scheme \"{}\"", url.scheme()),
        }),
        Err(e) => Err(WebOneError::InvalidTarget {
            target: target.to_string(),
            message: e.to_string(),
        }),
    }
}

/// 将引用解析为相对于 `base` 的绝对 URL
///
/// 相对路径、协议相对路径和仅包含片段的引用都能正确处理。
/// 无法解析的引用会中止整个请求。
pub fn resolve_reference(base: &Url, reference: &str) -> Result<Url, WebOneError> {
    base.join(reference.trim())
        .map_err(|e| WebOneError::MalformedReference {
            reference: reference.to_string(),
            message: e.to_string(),
        })
}

/// 对单个查询参数进行百分号编码
pub fn encode_query_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// 构建经由代理入口的重定向地址
pub fn proxy_url(routes: &ProxyRoutes, target: &Url) -> String {
    format!(
        "{}{}",
        routes.redirect_prefix(),
        encode_query_component(target.as_str())
    )
}

/// 从 Referer 中恢复表单所在页面的来源地址
///
/// 只有经由代理入口渲染的页面才能恢复，例如
/// `http://localhost:8888/search?query=http%3A%2F%2Fexample.com%2F`。
pub fn source_from_referer(referer: &str, routes: &ProxyRoutes) -> Option<Url> {
    let referer = Url::parse(referer).ok()?;

    if referer.path() != routes.entry_path {
        return None;
    }

    referer
        .query_pairs()
        .find(|(name, _)| name == routes.entry_param.as_str())
        .and_then(|(_, value)| normalize_target(&value).ok())
}

pub fn is_http_url(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}
