//! Portfolio Website - Chat Relay Backend
//!
//! 使用 axum 框架构建的后端服务：托管作品集前端静态文件，并把聊天小部件的
//! 问题转发给 LLM。`portfolio-chat chat [endpoint]` 以终端方式运行聊天小部件。

use axum::{
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;
mod widget;

use api::{create_api_routes, CHAT_PATH};
use config::{get_config, AppConfig};
use error::AppError;
use state::create_shared_state;

/// 未捕获的 panic 统一映射为 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(detail).into_response()
}

/// 组装完整应用：API 路由 + 静态文件 + 中间件
fn build_app(config: &AppConfig) -> Result<Router, AppError> {
    let state = create_shared_state(config)?;

    // 配置 CORS（允许所有来源）
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    Ok(Router::new()
        .merge(create_api_routes(state))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    info!("Starting portfolio chat relay...");

    let app = build_app(config)?;

    let addr: SocketAddr = config.bind_addr.parse()?;
    info!("Server listening on: {}", addr);
    info!("Serving static files from: {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = get_config();
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("chat") => {
            let endpoint = args
                .next()
                .unwrap_or_else(|| format!("http://{}{}", config.bind_addr, CHAT_PATH));
            widget::run_terminal(&endpoint).await
        }
        Some(other) => anyhow::bail!("unknown command: {} (expected `chat` or no arguments)", other),
        None => serve(config).await,
    }
}
