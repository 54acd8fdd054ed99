//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait。
//! 返回给客户端的只有状态码和固定的简短信息，详细原因只写日志。

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::llm::LlmError;

/// 缺少 message 时的固定错误信息
pub const MESSAGE_REQUIRED: &str = "Message is required";
/// 服务端配置错误时的固定错误信息
pub const SERVER_CONFIGURATION_ERROR: &str = "Server configuration error";
/// 其他失败的固定错误信息
pub const FAILED_TO_PROCESS: &str = "Failed to process request";

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 非 POST 请求
    #[error("方法不允许: {0}")]
    MethodNotAllowed(String),

    /// 请求体无法解析或 message 为空
    #[error("请求错误: {0}")]
    MessageRequired(String),

    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(String),

    /// LLM 调用错误
    #[error("LLM 错误: {0}")]
    Llm(#[from] LlmError),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MethodNotAllowed(_) => {
                return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "POST")]).into_response();
            }
            AppError::MessageRequired(_) => (StatusCode::BAD_REQUEST, MESSAGE_REQUIRED),
            AppError::Config(_) => {
                error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_CONFIGURATION_ERROR)
            }
            AppError::Llm(_) | AppError::Internal(_) => {
                error!("Error processing request: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_PROCESS)
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_method_not_allowed_has_empty_body() {
        let response = AppError::MethodNotAllowed("GET".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_config_error_is_opaque() {
        let response = AppError::Config("OPENAI_API_KEY is not set".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            r#"{"error":"Server configuration error"}"#
        );
    }

    #[tokio::test]
    async fn test_llm_error_is_opaque() {
        let err = AppError::from(LlmError::ApiError {
            status: 429,
            message: "Rate limit reached for org-secret".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, r#"{"error":"Failed to process request"}"#);
        assert!(!body.contains("org-secret"));
    }
}
