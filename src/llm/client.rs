//! LLM HTTP 客户端

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::openai::complete_openai;
use super::provider::ChatProvider;
use super::types::{ChatMessage, ChatOptions, LlmError};
use crate::utils::request_logger::RequestLog;

/// OpenAI 兼容的 LLM 客户端
///
/// 每次调用只发一个请求，不重试。
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        // 构建 HTTP 客户端
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ChatProvider for LlmClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        let log = RequestLog::start(model, messages.len(), &self.api_key);

        let result = complete_openai(
            &self.client,
            &self.api_key,
            &self.base_url,
            &messages,
            model,
            options,
        )
        .await;

        match &result {
            Ok(reply) => log.log_success(reply.len()),
            Err(e) => log.log_error(e),
        }
        result
    }
}
