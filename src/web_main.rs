//! Web 服务器主程序入口

#[cfg(feature = "web")]
use clap::Parser;
#[cfg(feature = "web")]
use std::sync::Arc;
#[cfg(feature = "web")]
use tracing_subscriber::EnvFilter;
#[cfg(feature = "web")]
use webone::{
    core::PurifyOptions,
    env::EnvConfig,
    network::FetchSettings,
    parsers::TagPolicy,
    web::{AppState, WebConfig, WebServer},
};

/// 为老旧浏览器净化网页的代理服务器
#[cfg(feature = "web")]
#[derive(Parser, Debug)]
#[command(name = "webone", version, about)]
struct Cli {
    /// 绑定地址，覆盖 WEBONE_BIND_ADDRESS
    #[arg(short, long)]
    bind: Option<String>,

    /// 端口，覆盖 WEBONE_PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// 静态文件目录，覆盖 WEBONE_STATIC_DIR
    #[arg(short, long)]
    static_dir: Option<String>,

    /// 输出环境变量说明后退出
    #[arg(long)]
    env_docs: bool,
}

#[cfg(feature = "web")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.env_docs {
        print!("{}", webone::env::generate_env_docs());
        return Ok(());
    }

    let env_config = EnvConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&env_config.log_level))
        .init();

    env_config.log_summary();

    let web_config = WebConfig {
        bind_addr: cli.bind.unwrap_or_else(|| env_config.web_bind_address.clone()),
        port: cli.port.unwrap_or(env_config.web_port),
        static_dir: cli
            .static_dir
            .or_else(|| Some(env_config.web_static_dir.clone()))
            .filter(|dir| !dir.is_empty()),
    };
    web_config.validate()?;

    let options = PurifyOptions {
        policy: Arc::new(TagPolicy::default()),
        collapse_lists: env_config.collapse_lists,
        ..PurifyOptions::default()
    };
    let fetch = FetchSettings {
        timeout: env_config.fetch_timeout,
        user_agent: env_config.user_agent.clone(),
    };

    let mut state = AppState::new(options, fetch);
    if env_config.cache_enabled {
        state = state.with_cache(env_config.cache_capacity);
    }

    let server = WebServer::new(web_config, state);
    server.start().await?;

    Ok(())
}

#[cfg(not(feature = "web"))]
fn main() {
    eprintln!("Error: Web feature not enabled. Please compile with --features web");
    std::process::exit(1);
}
