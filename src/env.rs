//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量管理

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "WEBONE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 上游请求相关环境变量
pub mod fetch {
    use super::*;
    use crate::network::session::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
    use reqwest::header::HeaderValue;

    /// 请求超时
    pub struct TimeoutSecs;
    impl EnvVar<Duration> for TimeoutSecs {
        const NAME: &'static str = "WEBONE_FETCH_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        const DESCRIPTION: &'static str = "Upstream request timeout in seconds (1-120)";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_usize(value.trim(), Self::NAME, 1, 120)?;
            Ok(Duration::from_secs(seconds as u64))
        }
    }

    /// 发往上游的 User-Agent
    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "WEBONE_USER_AGENT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "User-Agent header sent upstream";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(DEFAULT_USER_AGENT.to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let user_agent = value.trim();
            if user_agent.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "User-Agent cannot be empty".to_string(),
                });
            }
            HeaderValue::from_str(user_agent).map_err(|e| EnvError {
                variable: Self::NAME.to_string(),
                message: format!("Invalid header value: {}", e),
            })?;
            Ok(user_agent.to_string())
        }
    }
}

/// 输出渲染相关环境变量
pub mod render {
    use super::*;

    /// 折叠列表
    pub struct CollapseLists;
    impl EnvVar<bool> for CollapseLists {
        const NAME: &'static str = "WEBONE_COLLAPSE_LISTS";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str =
            "Wrap lists outside of navigation into collapsible <details> blocks";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;
    use crate::network::cache::DEFAULT_CACHE_CAPACITY;

    /// 缓存启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "WEBONE_CACHE_ENABLED";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Cache purified pages in memory";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 缓存容量
    pub struct Capacity;
    impl EnvVar<usize> for Capacity {
        const NAME: &'static str = "WEBONE_CACHE_CAPACITY";
        const DEFAULT: Option<usize> = Some(DEFAULT_CACHE_CAPACITY);
        const DESCRIPTION: &'static str = "Number of purified pages kept in the cache";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value.trim(), Self::NAME, 1, 100000)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "WEBONE_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Web server bind address";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("localhost".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "WEBONE_PORT";
        const DEFAULT: Option<u16> = Some(8888);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            match value.trim().parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Must be a valid port number (1-65535)".to_string(),
                }),
            }
        }
    }

    /// 静态文件目录
    pub struct StaticDir;
    impl EnvVar<String> for StaticDir {
        const NAME: &'static str = "WEBONE_STATIC_DIR";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Directory served under /public";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("public".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_level: String,

    // 上游请求
    pub fetch_timeout: Duration,
    pub user_agent: String,

    pub collapse_lists: bool,

    // 缓存配置
    pub cache_enabled: bool,
    pub cache_capacity: usize,

    // Web配置
    pub web_bind_address: String,
    pub web_port: u16,
    pub web_static_dir: String,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,

            fetch_timeout: fetch::TimeoutSecs::get()?,
            user_agent: fetch::UserAgent::get()?,

            collapse_lists: render::CollapseLists::get()?,

            cache_enabled: cache::Enabled::get()?,
            cache_capacity: cache::Capacity::get()?,

            web_bind_address: web::BindAddress::get()?,
            web_port: web::Port::get()?,
            web_static_dir: web::StaticDir::get()?,
        })
    }

    /// 记录配置摘要
    pub fn log_summary(&self) {
        tracing::info!("Environment configuration:");
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Fetch timeout: {:?}", self.fetch_timeout);
        tracing::info!(
            "  Collapse lists: {}",
            if self.collapse_lists { "enabled" } else { "disabled" }
        );
        if self.cache_enabled {
            tracing::info!("  Cache: enabled ({} pages)", self.cache_capacity);
        } else {
            tracing::info!("  Cache: disabled");
        }
        tracing::info!("  Web server: {}:{}", self.web_bind_address, self.web_port);
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");
    docs.push_str("| Variable | Description | Default |\n");
    docs.push_str("|----------|-------------|---------|\n");

    let rows: [(&str, &str, String); 9] = [
        (core::LogLevel::NAME, core::LogLevel::DESCRIPTION, "info".to_string()),
        (
            fetch::TimeoutSecs::NAME,
            fetch::TimeoutSecs::DESCRIPTION,
            crate::network::session::DEFAULT_TIMEOUT_SECS.to_string(),
        ),
        (
            fetch::UserAgent::NAME,
            fetch::UserAgent::DESCRIPTION,
            "Safari desktop".to_string(),
        ),
        (
            render::CollapseLists::NAME,
            render::CollapseLists::DESCRIPTION,
            format!("{:?}", render::CollapseLists::DEFAULT.unwrap_or_default()),
        ),
        (
            cache::Enabled::NAME,
            cache::Enabled::DESCRIPTION,
            format!("{:?}", cache::Enabled::DEFAULT.unwrap_or_default()),
        ),
        (
            cache::Capacity::NAME,
            cache::Capacity::DESCRIPTION,
            format!("{}", cache::Capacity::DEFAULT.unwrap_or_default()),
        ),
        (
            web::BindAddress::NAME,
            web::BindAddress::DESCRIPTION,
            "localhost".to_string(),
        ),
        (
            web::Port::NAME,
            web::Port::DESCRIPTION,
            format!("{}", web::Port::DEFAULT.unwrap_or_default()),
        ),
        (
            web::StaticDir::NAME,
            web::StaticDir::DESCRIPTION,
            "public".to_string(),
        ),
    ];

    for (name, description, default) in rows {
        docs.push_str(&format!("| `{}` | {} | `{}` |\n", name, description, default));
    }

    docs
}
