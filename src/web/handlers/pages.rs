//! 页面处理器

use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::web::{templates, types::AppState};

/// 主页处理器
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::index_page(&state.options.routes))
}
