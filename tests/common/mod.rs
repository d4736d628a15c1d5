// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use url::Url;

use webone::core::{ProxyRoutes, RequestContext, WebOneError};
use webone::network::{FetchRequest, FetchedDocument, Fetcher};
use webone::parsers::html::{get_node_name, html_to_dom, serialize_document};
use webone::parsers::{Purifier, TagPolicy};

pub const SOURCE_URL: &str = "http://example.com/a/";

/// HTML 测试辅助工具
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    pub fn parse(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8").unwrap()
    }

    pub fn serialize(dom: RcDom) -> String {
        String::from_utf8(serialize_document(dom).unwrap()).unwrap()
    }

    /// 用完整的处理器链净化一段 HTML
    pub fn purify(html: &str, policy: &TagPolicy, routes: &ProxyRoutes) -> String {
        let dom = Self::parse(html);
        let context = RequestContext::new(Url::parse(SOURCE_URL).unwrap(), routes);
        Purifier::new(policy).purify(&dom.document, &context).unwrap();
        Self::serialize(dom)
    }

    /// 只做白名单过滤，不改写链接和表单
    pub fn filter(html: &str, policy: &TagPolicy) -> String {
        let dom = Self::parse(html);
        let routes = ProxyRoutes::default();
        let context = RequestContext::new(Url::parse(SOURCE_URL).unwrap(), &routes);
        Purifier::filter_only(policy)
            .purify(&dom.document, &context)
            .unwrap();
        Self::serialize(dom)
    }

    /// 深度优先收集所有元素节点
    pub fn elements(handle: &Handle) -> Vec<Handle> {
        let mut found = Vec::new();
        for child in handle.children.borrow().iter() {
            if let NodeData::Element { .. } = child.data {
                found.push(child.clone());
            }
            found.extend(Self::elements(child));
        }
        found
    }

    pub fn element_name(handle: &Handle) -> String {
        get_node_name(handle).unwrap_or_default().to_string()
    }

    pub fn attribute_names(handle: &Handle) -> Vec<String> {
        match handle.data {
            NodeData::Element { ref attrs, .. } => attrs
                .borrow()
                .iter()
                .map(|attr| attr.name.local.to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

pub fn html_document(final_url: &str, html: &str) -> FetchedDocument {
    FetchedDocument {
        data: html.as_bytes().to_vec(),
        final_url: Url::parse(final_url).unwrap(),
        media_type: "text/html".to_string(),
        charset: Some("utf-8".to_string()),
    }
}

/// 不访问网络的上游替身，按 URL 返回预设的响应
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, Result<FetchedDocument, WebOneError>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        let document = html_document(url, html);
        self.with_document(url, document)
    }

    pub fn with_document(mut self, url: &str, document: FetchedDocument) -> Self {
        self.pages.insert(url.to_string(), Ok(document));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16, body: &str) -> Self {
        let error = WebOneError::Fetch {
            url: url.to_string(),
            status: Some(status),
            message: format!("upstream responded with {}", status),
            body: body.to_string(),
        };
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedDocument, WebOneError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let key = request.url().to_string();
        match self.pages.get(&key) {
            Some(Ok(document)) => Ok(document.clone()),
            Some(Err(WebOneError::Fetch {
                url,
                status,
                message,
                body,
            })) => Err(WebOneError::Fetch {
                url: url.clone(),
                status: *status,
                message: message.clone(),
                body: body.clone(),
            }),
            _ => Err(WebOneError::Fetch {
                url: key,
                status: Some(404),
                message: "upstream responded with 404".to_string(),
                body: String::new(),
            }),
        }
    }
}
