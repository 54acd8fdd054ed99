//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};

/// 聊天请求
///
/// 只有一个字段；不接受历史消息。
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// 聊天响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}
