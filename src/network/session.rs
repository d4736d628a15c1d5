use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, warn};
use url::Url;

use crate::core::{parse_content_type, WebOneError};
use crate::env::fetch::UserAgent;
use crate::env::{EnvError, EnvVar};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_1) AppleWebKit/602.2.14 (KHTML, like Gecko) Version/10.0.1 Safari/602.2.14";
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 上游响应体在错误信息中保留的最大字符数
const ERROR_BODY_SNIPPET_CHARS: usize = 512;

#[derive(Clone, Debug)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// 发往上游站点的请求
#[derive(Clone, Debug, PartialEq)]
pub enum FetchRequest {
    Get(Url),
    /// 表单字段以 `application/x-www-form-urlencoded` 形式提交
    Post {
        url: Url,
        form: Vec<(String, String)>,
    },
}

impl FetchRequest {
    pub fn url(&self) -> &Url {
        match self {
            FetchRequest::Get(url) => url,
            FetchRequest::Post { url, .. } => url,
        }
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            FetchRequest::Get(_) => "GET",
            FetchRequest::Post { .. } => "POST",
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, FetchRequest::Get(_))
    }
}

/// 上游成功返回的文档
#[derive(Clone, Debug)]
pub struct FetchedDocument {
    pub data: Vec<u8>,
    /// 跟随重定向之后的最终地址
    pub final_url: Url,
    pub media_type: String,
    pub charset: Option<String>,
}

/// Retrieves upstream documents for the purification pipeline
pub trait Fetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedDocument, WebOneError>;
}

pub struct Session {
    client: Client,
}

impl Session {
    pub fn new(settings: &FetchSettings) -> Result<Self, WebOneError> {
        let mut header_map = HeaderMap::new();
        header_map.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        let user_agent = HeaderValue::from_str(&settings.user_agent).map_err(|e| {
            WebOneError::Config(EnvError {
                variable: UserAgent::NAME.to_string(),
                message: format!("invalid User-Agent header: {}", e),
            })
        })?;
        header_map.insert(USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(settings.timeout)
            .default_headers(header_map)
            .build()
            .map_err(|e| WebOneError::Fetch {
                url: String::new(),
                status: None,
                message: format!("unable to build HTTP client: {}", e),
                body: String::new(),
            })?;

        Ok(Session { client })
    }
}

impl Fetcher for Session {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedDocument, WebOneError> {
        let url = request.url();
        let builder = match request {
            FetchRequest::Get(url) => self.client.get(url.as_str()),
            FetchRequest::Post { url, form } => self.client.post(url.as_str()).form(form),
        };

        let response = builder.send().map_err(|e| {
            warn!("{} {} failed: {}", request.method_name(), url, e);
            WebOneError::Fetch {
                url: url.to_string(),
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
                body: String::new(),
            }
        })?;

        let status = response.status();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|header| header.to_str().ok())
            .unwrap_or("")
            .to_string();

        let data = response
            .bytes()
            .map_err(|e| WebOneError::Fetch {
                url: final_url.to_string(),
                status: Some(status.as_u16()),
                message: format!("unable to read response body: {}", e),
                body: String::new(),
            })?
            .to_vec();

        ensure_success(status, &final_url, &data)?;

        if final_url != *url {
            debug!("{} redirected to {}", url, final_url);
        }

        let (media_type, charset) = parse_content_type(&content_type);

        Ok(FetchedDocument {
            data,
            final_url,
            media_type,
            charset: if charset.is_empty() {
                None
            } else {
                Some(charset)
            },
        })
    }
}

/// 只有 200 被视为成功，其他状态码连同部分响应体一起报告
pub fn ensure_success(status: StatusCode, url: &Url, body: &[u8]) -> Result<(), WebOneError> {
    if status == StatusCode::OK {
        return Ok(());
    }

    warn!("{} responded with {}", url, status);

    Err(WebOneError::Fetch {
        url: url.to_string(),
        status: Some(status.as_u16()),
        message: format!("upstream responded with {}", status),
        body: String::from_utf8_lossy(body)
            .chars()
            .take(ERROR_BODY_SNIPPET_CHARS)
            .collect(),
    })
}
