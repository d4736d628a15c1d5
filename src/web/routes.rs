//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ProxyRoutes;
use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
///
/// 入口路径和表单端点来自 `ProxyRoutes`，与页面中重写出的地址保持一致。
pub fn create_routes(routes: &ProxyRoutes) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route(&routes.entry_path, get(search))
        .route(&routes.form_endpoint, post(forms))
}
