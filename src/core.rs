use std::sync::Arc;
use std::time::Instant;

use encoding_rs::Encoding;
use markup5ever_rcdom::RcDom;
use thiserror::Error;
use url::Url;

use crate::env::EnvError;
use crate::network::session::{FetchRequest, FetchedDocument, Fetcher};
use crate::parsers::html::{
    collapse_lists, get_base_url, get_charset, get_title, html_to_dom, serialize_document,
    Purifier, TagPolicy,
};
use crate::utils::url::{resolve_reference, ORIGIN_ACTION_FIELD, ORIGIN_METHOD_FIELD};

/// Represents errors that can occur while purifying a page
///
/// Every variant is terminal for the request that raised it.
#[derive(Error, Debug)]
pub enum WebOneError {
    /// 网络错误或上游返回了非 200 状态码
    #[error("Failed to fetch {url}: {message}")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
        body: String,
    },

    /// 输入无法解析为 HTML 文档
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// 文档中的链接或 base URL 无法解析
    #[error("Malformed reference \"{reference}\": {message}")]
    MalformedReference { reference: String, message: String },

    /// 调用方提供的目标地址无效
    #[error("Invalid target \"{target}\": {message}")]
    InvalidTarget { target: String, message: String },

    /// 表单的原始提交方法暂不支持
    #[error("Unsupported form method \"{0}\"")]
    UnsupportedMethod(String),

    /// 环境变量配置错误
    #[error(transparent)]
    Config(#[from] EnvError),
}

/// 代理自身对外暴露的路由
///
/// 链接重写、表单重写和 head 注入都依赖这些路径，
/// 它们必须与 Web 层实际注册的路由保持一致。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyRoutes {
    /// 入口路径，例如 `/search`
    pub entry_path: String,
    /// 入口路径上携带目标 URL 的查询参数名
    pub entry_param: String,
    /// 表单提交端点
    pub form_endpoint: String,
    /// 注入到每个页面 head 中的样式表路径
    pub stylesheet_path: String,
}

impl ProxyRoutes {
    /// 重定向目标前缀，被编码后的绝对 URL 直接拼接在其后
    pub fn redirect_prefix(&self) -> String {
        format!("{}?{}=", self.entry_path, self.entry_param)
    }
}

impl Default for ProxyRoutes {
    fn default() -> Self {
        Self {
            entry_path: "/search".to_string(),
            entry_param: "query".to_string(),
            form_endpoint: "/forms".to_string(),
            stylesheet_path: "/public/main.css".to_string(),
        }
    }
}

/// Configuration options for purification
///
/// Shared read-only between all requests.
#[derive(Clone, Debug, Default)]
pub struct PurifyOptions {
    pub policy: Arc<TagPolicy>,
    pub routes: ProxyRoutes,
    /// Wrap every `ul` outside of `nav` into a collapsible `details` block
    pub collapse_lists: bool,
}

/// 单次请求的上下文
///
/// 保存页面的来源 URL 和解析相对链接所用的基础 URL。
/// 每个请求各自持有一份，绝不在请求之间共享。
#[derive(Clone, Debug)]
pub struct RequestContext<'a> {
    source_url: Url,
    base_url: Url,
    requested_url: Url,
    routes: &'a ProxyRoutes,
}

impl<'a> RequestContext<'a> {
    pub fn new(source_url: Url, routes: &'a ProxyRoutes) -> Self {
        Self {
            base_url: source_url.clone(),
            requested_url: source_url.clone(),
            source_url,
            routes,
        }
    }

    /// 记录客户端实际请求的地址，发生重定向时它与来源 URL 不同
    ///
    /// 表单端点只能从 Referer 中恢复这个地址。
    pub fn with_requested_url(mut self, requested_url: Url) -> Self {
        self.requested_url = requested_url;
        self
    }

    /// 使用文档中 `<base href>` 声明的地址覆盖基础 URL
    ///
    /// 不能作为基础地址的引用（例如 `javascript:`）会被忽略。
    pub fn with_base_href(mut self, base_href: &str) -> Result<Self, WebOneError> {
        let base_url = resolve_reference(&self.source_url, base_href)?;
        if base_url.cannot_be_a_base() {
            tracing::debug!("忽略无法作为基础地址的 base: {}", base_url);
        } else {
            self.base_url = base_url;
        }
        Ok(self)
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    pub fn requested_url(&self) -> &Url {
        &self.requested_url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn routes(&self) -> &ProxyRoutes {
        self.routes
    }
}

/// 净化完成的页面
#[derive(Clone, Debug)]
pub struct PurifiedPage {
    pub data: Vec<u8>,
    pub title: Option<String>,
    pub source_url: Url,
}

// All known non-"text/..." markup media types
const MARKUP_MEDIA_TYPES: &[&str] = &[
    "application/xhtml+xml",           // .xhtml
    "application/xml",                 // .xml
    "application/vnd.mozilla.xul+xml", // .xul
];

/// Fetches the target and purifies it
///
/// The fetch is the only blocking step; when it fails nothing is parsed.
pub fn purify_target(
    fetcher: &dyn Fetcher,
    options: &PurifyOptions,
    request: &FetchRequest,
) -> Result<PurifiedPage, WebOneError> {
    tracing::info!("获取页面: {} {}", request.method_name(), request.url());

    let document = fetcher.fetch(request)?;
    purify_fetched_document(options, document, request.url())
}

/// 净化一个已经获取到的文档
///
/// `requested_url` 是客户端请求的地址，跟随重定向后可能与
/// `document.final_url` 不同。
pub fn purify_fetched_document(
    options: &PurifyOptions,
    document: FetchedDocument,
    requested_url: &Url,
) -> Result<PurifiedPage, WebOneError> {
    if !is_markup_media_type(&document.media_type) {
        return Err(WebOneError::Parse(format!(
            "unsupported media type: {}",
            document.media_type
        )));
    }

    let processor = DocumentProcessor::new(options);
    let (data, title) = processor.process_requested_document(
        &document.data,
        document.charset.clone(),
        &document.final_url,
        requested_url,
    )?;

    Ok(PurifiedPage {
        data,
        title,
        source_url: document.final_url,
    })
}

/// Purifies raw markup fetched from `source_url`
///
/// # Returns
///
/// The serialized document (always UTF-8) and its title, if it has one.
pub fn purify_document_from_data(
    options: &PurifyOptions,
    input_data: &[u8],
    input_encoding: Option<String>,
    source_url: &Url,
) -> Result<(Vec<u8>, Option<String>), WebOneError> {
    let processor = DocumentProcessor::new(options);
    processor.process_document(input_data, input_encoding, source_url)
}

/// 根据表单端点收到的字段重建原始请求
///
/// `source_url` 是表单所在页面的来源地址，用来解析相对的 action。
/// 仅支持 GET 和 POST 两种原始方法。
pub fn build_form_request(
    fields: &[(String, String)],
    source_url: Option<&Url>,
) -> Result<FetchRequest, WebOneError> {
    let mut origin_action = None;
    let mut origin_method = None;
    let mut payload = Vec::with_capacity(fields.len());

    for (name, value) in fields {
        match name.as_str() {
            ORIGIN_ACTION_FIELD => origin_action = Some(value.as_str()),
            ORIGIN_METHOD_FIELD => origin_method = Some(value.as_str()),
            _ => payload.push((name.clone(), value.clone())),
        }
    }

    let origin_action = origin_action.ok_or_else(|| WebOneError::InvalidTarget {
        target: String::new(),
        message: format!("missing {ORIGIN_ACTION_FIELD} field"),
    })?;

    let mut action_url = match source_url {
        Some(source_url) => source_url.join(origin_action.trim()),
        None => Url::parse(origin_action.trim()),
    }
    .map_err(|e| WebOneError::InvalidTarget {
        target: origin_action.to_string(),
        message: e.to_string(),
    })?;

    let method = origin_method
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .unwrap_or("get");

    if method.eq_ignore_ascii_case("get") {
        action_url.set_fragment(None);
        action_url.query_pairs_mut().clear().extend_pairs(&payload);
        Ok(FetchRequest::Get(action_url))
    } else if method.eq_ignore_ascii_case("post") {
        Ok(FetchRequest::Post {
            url: action_url,
            form: payload,
        })
    } else {
        Err(WebOneError::UnsupportedMethod(method.to_string()))
    }
}

/// Parses Content-Type header value
pub fn parse_content_type(content_type: &str) -> (String, String) {
    let mut media_type = String::new();
    let mut charset = String::new();

    let parts: Vec<&str> = content_type.split(';').collect();

    if !parts.is_empty() {
        media_type = parts[0].trim().to_lowercase();
    }

    for part in parts.iter().skip(1) {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("charset=") {
            charset = value.trim_matches('"').to_string();
        }
    }

    (media_type, charset)
}

/// Checks if the given media type can be parsed as markup
///
/// Servers that omit Content-Type are given the benefit of the doubt.
pub fn is_markup_media_type(media_type: &str) -> bool {
    media_type.is_empty()
        || media_type.starts_with("text/")
        || MARKUP_MEDIA_TYPES.contains(&media_type)
}

/// 文档处理器，负责协调整个净化流程
pub struct DocumentProcessor<'a> {
    options: &'a PurifyOptions,
}

impl<'a> DocumentProcessor<'a> {
    pub fn new(options: &'a PurifyOptions) -> Self {
        Self { options }
    }

    /// 处理文档数据并返回最终结果
    pub fn process_document(
        &self,
        input_data: &[u8],
        input_encoding: Option<String>,
        source_url: &Url,
    ) -> Result<(Vec<u8>, Option<String>), WebOneError> {
        self.process_requested_document(input_data, input_encoding, source_url, source_url)
    }

    /// 同 `process_document`，但客户端请求的地址与来源 URL 不同
    pub fn process_requested_document(
        &self,
        input_data: &[u8],
        input_encoding: Option<String>,
        source_url: &Url,
        requested_url: &Url,
    ) -> Result<(Vec<u8>, Option<String>), WebOneError> {
        // 1. 解析文档，必要时按文档声明的编码重新解析
        let encoding_processor = EncodingProcessor::new();
        let dom = encoding_processor.process_encoding(input_data, input_encoding)?;

        let start = Instant::now();

        // 2. 确定基础URL，BASE 元素会在净化时被移除，必须提前读取
        let mut context = RequestContext::new(source_url.clone(), &self.options.routes)
            .with_requested_url(requested_url.clone());
        if let Some(base_href) = get_base_url(&dom.document) {
            context = context.with_base_href(&base_href)?;
        }

        let document_title = get_title(&dom.document);

        // 3. 净化 DOM 并重写链接、表单和 head
        let dom = self.purify_dom(dom, &context)?;

        // 4. 折叠列表（如果启用）
        if self.options.collapse_lists {
            collapse_lists(&dom.document);
        }

        // 5. 序列化
        let mut result = serialize_document(dom)?;
        if result.last() != Some(&b'\n') {
            result.push(b'\n');
        }

        tracing::info!(
            "purifying {} finished after {:?} (excluding network communication)",
            source_url,
            start.elapsed()
        );

        Ok((result, document_title))
    }

    fn purify_dom(&self, dom: RcDom, context: &RequestContext) -> Result<RcDom, WebOneError> {
        let purifier = Purifier::new(&self.options.policy);
        purifier.purify(&dom.document, context)?;
        Ok(dom)
    }
}

/// 编码处理器
pub struct EncodingProcessor;

impl EncodingProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn process_encoding(
        &self,
        input_data: &[u8],
        input_encoding: Option<String>,
    ) -> Result<RcDom, WebOneError> {
        // 响应头中声明的编码优先
        if let Some(encoding) = input_encoding.filter(|e| !e.is_empty()) {
            return html_to_dom(input_data, &encoding);
        }

        let dom = html_to_dom(input_data, "utf-8")?;

        // 尝试使用 HTML 内部声明的字符集
        if let Some(html_charset) = get_charset(&dom.document) {
            if let Some(document_charset) =
                Encoding::for_label_no_replacement(html_charset.trim().as_bytes())
            {
                if document_charset != encoding_rs::UTF_8 {
                    return html_to_dom(input_data, document_charset.name());
                }
            }
        }

        Ok(dom)
    }
}

impl Default for EncodingProcessor {
    fn default() -> Self {
        Self::new()
    }
}
