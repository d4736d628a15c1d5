//! 代理入口与表单端点

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::task;

use crate::core::{build_form_request, purify_target, PurifiedPage, WebOneError};
use crate::network::session::{FetchRequest, Session};
use crate::utils::url::{normalize_target, source_from_referer};
use crate::web::types::AppState;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// 代理入口：`GET /search?query=<url>`
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let target = params
        .get(&state.options.routes.entry_param)
        .map(String::as_str)
        .unwrap_or_default();

    match normalize_target(target) {
        Ok(url) => respond(state, FetchRequest::Get(url)).await,
        Err(e) => error_response(e),
    }
}

/// 表单端点：按隐藏字段重建原始请求
///
/// 相对的原始 action 依据 Referer 中记录的来源页面解析。
pub async fn forms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let source_url = headers
        .get(header::REFERER)
        .and_then(|referer| referer.to_str().ok())
        .and_then(|referer| source_from_referer(referer, &state.options.routes));

    match build_form_request(&fields, source_url.as_ref()) {
        Ok(request) => respond(state, request).await,
        Err(e) => error_response(e),
    }
}

async fn respond(state: Arc<AppState>, request: FetchRequest) -> Response {
    // 只缓存 GET 请求
    let cache_key = request.is_get().then(|| request.url().to_string());

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Some(page) = cache.get(key) {
            return page_response(page);
        }
    }

    let task_state = Arc::clone(&state);
    let outcome = task::spawn_blocking(move || match &task_state.fetcher {
        Some(fetcher) => purify_target(&**fetcher, &task_state.options, &request),
        None => {
            let session = Session::new(&task_state.fetch)?;
            purify_target(&session, &task_state.options, &request)
        }
    })
    .await;

    match outcome {
        Ok(Ok(page)) => {
            tracing::info!(
                "已净化 {} ({})",
                page.source_url,
                page.title.as_deref().unwrap_or("untitled")
            );
            if let (Some(cache), Some(key)) = (&state.cache, cache_key) {
                cache.insert(key, page.clone());
            }
            page_response(page)
        }
        Ok(Err(e)) => error_response(e),
        Err(e) => {
            tracing::error!("净化任务执行失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("任务执行失败: {}", e),
            )
                .into_response()
        }
    }
}

fn page_response(page: PurifiedPage) -> Response {
    ([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], page.data).into_response()
}

/// 将错误转换为 HTTP 响应
pub fn error_response(error: WebOneError) -> Response {
    let status = match &error {
        WebOneError::InvalidTarget { .. } => StatusCode::BAD_REQUEST,
        WebOneError::UnsupportedMethod(_) => StatusCode::NOT_IMPLEMENTED,
        WebOneError::Fetch { .. }
        | WebOneError::Parse(_)
        | WebOneError::MalformedReference { .. }
        | WebOneError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("{}", error);
    } else {
        tracing::warn!("{}", error);
    }

    let body = match &error {
        WebOneError::Fetch {
            status: Some(upstream),
            body,
            ..
        } if !body.is_empty() => format!("{} (upstream status {})\n\n{}", error, upstream, body),
        WebOneError::Fetch {
            status: Some(upstream),
            ..
        } => format!("{} (upstream status {})", error, upstream),
        _ => error.to_string(),
    };

    (status, body).into_response()
}
