//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use crate::env::{EnvError, EnvResult, EnvVar};

/// Web 服务器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// 静态文件目录，挂载在 `/public` 下
    pub static_dir: Option<String>,
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::web;

        let static_dir = web::StaticDir::get()?;

        Ok(Self {
            bind_addr: web::BindAddress::get()?,
            port: web::Port::get()?,
            static_dir: if static_dir.is_empty() {
                None
            } else {
                Some(static_dir)
            },
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        use crate::env::web;

        if self.bind_addr.trim().is_empty() {
            return Err(EnvError {
                variable: web::BindAddress::NAME.to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: web::Port::NAME.to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if let Some(ref static_dir) = self.static_dir {
            if !std::path::Path::new(static_dir).exists() {
                tracing::warn!("Static directory '{}' does not exist", static_dir);
            }
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load web config from environment: {}. Using defaults.",
                e
            );
            Self {
                bind_addr: "localhost".to_string(),
                port: 8888,
                static_dir: Some("public".to_string()),
            }
        })
    }
}
