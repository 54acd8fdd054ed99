//! 小部件到中继端点的传输层

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::models::ChatReply;

/// 传输错误
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// 网络错误
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    /// 非成功状态码
    #[error("中继返回状态码 {0}")]
    Status(u16),

    /// 响应不是 { "reply": string }
    #[error("响应格式错误: {0}")]
    Malformed(String),
}

/// 发送一条消息，返回回复文本
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, RelayError>;
}

/// 基于 HTTP 的传输
pub struct HttpRelayTransport {
    client: Client,
    endpoint: String,
}

impl HttpRelayTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, message: &str) -> Result<String, RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "message": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|e| RelayError::Malformed(e.to_string()))?;
        Ok(reply.reply)
    }
}
