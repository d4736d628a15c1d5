//! Web 服务器模块
//!
//! 把净化流水线挂到 HTTP 入口上：首页、`/search` 代理入口、
//! `/forms` 表单端点，以及 `/public` 下的静态样式表。

pub mod config;
pub mod handlers;
pub mod routes;
pub mod templates;
pub mod types;

pub use config::WebConfig;
pub use routes::create_routes;
pub use types::{AppState, SharedFetcher};

use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 启动 Web 服务器，直到监听结束才返回
    pub async fn start(&self) -> std::io::Result<()> {
        let app = create_router(Arc::clone(&self.state), &self.config);
        let address = self.config.listen_address();

        let listener = tokio::net::TcpListener::bind(&address).await?;

        tracing::info!("Web server starting at http://{}", address);

        axum::serve(listener, app).await
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let mut app = create_routes(&app_state.options.routes).with_state(Arc::clone(&app_state));

    // 静态文件服务（如果配置了）
    if let Some(static_dir) = &config.static_dir {
        app = app.nest_service("/public", ServeDir::new(static_dir));
    }

    app
}
