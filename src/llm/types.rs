//! LLM 类型定义

use serde::{Deserialize, Serialize};

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 角色：system, user
    pub role: String,
    /// 消息内容
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 聊天选项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// 温度参数
    pub temperature: Option<f64>,
    /// 最大 token 数
    pub max_tokens: Option<u32>,
}

/// LLM 错误类型
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP 请求错误
    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API 返回错误
    #[error("API 错误 ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// 超时错误
    #[error("请求超时")]
    Timeout,

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// JSON 解析错误
    #[error("JSON 解析失败: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 响应中没有可用的回复
    #[error("响应为空")]
    EmptyResponse,
}

impl LlmError {
    /// 日志用的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::HttpError(_) => "http",
            LlmError::ApiError { .. } => "api",
            LlmError::Timeout => "timeout",
            LlmError::ConfigError(_) => "config",
            LlmError::JsonError(_) => "json",
            LlmError::EmptyResponse => "empty_response",
        }
    }

    /// 上游 HTTP 状态码（如有）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            LlmError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
