//! 聊天中继端点
//!
//! 每个请求：received → rejected | forwarded → replied | failed，一次完成，不重试。

use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    routing::any,
    Json, Router,
};
use serde_json::error::Category;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

use crate::error::{AppError, AppResult};
use crate::models::{ChatReply, ChatRequest};
use crate::state::AppState;
use crate::utils::request_logger::generate_request_id;

/// 聊天中继入口
pub const CHAT_PATH: &str = "/api/chat";
/// 旧前端使用的函数路径
pub const LEGACY_CHAT_PATH: &str = "/.netlify/functions/chat";

/// 解析请求体，取出非空的 message
///
/// 请求体不是合法 JSON 时按内部错误处理（500）；JSON 合法但 message
/// 缺失、为空或类型不对时返回 400。message 原样保留，不做裁剪。
fn parse_message(body: &[u8]) -> AppResult<String> {
    let request: ChatRequest = serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Syntax | Category::Eof | Category::Io => {
            AppError::Internal(format!("invalid JSON body: {}", e))
        }
        Category::Data => {
            warn!("Rejected chat request body: {}", e);
            AppError::MessageRequired(e.to_string())
        }
    })?;

    request
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::MessageRequired("message is missing or empty".to_string()))
}

/// 聊天处理器
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> AppResult<Json<ChatReply>> {
    let span = info_span!("chat", request_id = %generate_request_id());

    async move {
        if method != Method::POST {
            return Err(AppError::MethodNotAllowed(method.to_string()));
        }

        let message = parse_message(&body)?;
        let reply = state.relay.relay(&message).await?;

        info!("Chat replied: reply_chars={}", reply.chars().count());
        Ok(Json(ChatReply { reply }))
    }
    .instrument(span)
    .await
}

/// 创建聊天路由
pub fn chat_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(CHAT_PATH, any(chat_handler))
        .route(LEGACY_CHAT_PATH, any(chat_handler))
}
