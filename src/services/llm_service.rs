//! LLM 服务封装
//!
//! 封装 ChatProvider，与配置系统集成。未配置 API 密钥时服务照常启动，
//! 每次调用再报告配置错误。

use std::sync::Arc;
use tracing::{error, warn};

use crate::config::AppConfig;
use crate::llm::{ChatMessage, ChatOptions, ChatProvider, LlmClient, LlmError};

/// 缺少密钥时写入日志的原因
const MISSING_API_KEY: &str = "OPENAI_API_KEY is not set";

/// LLM 服务
#[derive(Clone)]
pub struct LlmService {
    /// 不可用时保存原因，每次调用都报告它
    provider: Result<Arc<dyn ChatProvider>, String>,
    model: String,
    options: ChatOptions,
}

impl LlmService {
    /// 按配置创建服务
    pub fn from_config(config: &AppConfig) -> Self {
        let provider = match config.api_key.as_deref() {
            None => {
                warn!("{}; chat requests will fail until it is configured", MISSING_API_KEY);
                Err(MISSING_API_KEY.to_string())
            }
            Some(api_key) => match LlmClient::new(
                api_key,
                &config.base_url,
                config.request_timeout(),
                config.connect_timeout(),
            ) {
                Ok(client) => Ok(Arc::new(client) as Arc<dyn ChatProvider>),
                Err(e) => {
                    error!("Failed to build LLM client: {}", e);
                    Err(format!("failed to build LLM client: {}", e))
                }
            },
        };

        Self {
            provider,
            model: config.model.clone(),
            options: Self::options_from(config),
        }
    }

    /// 使用指定的 provider 创建服务
    #[cfg(test)]
    pub fn with_provider(provider: Arc<dyn ChatProvider>, config: &AppConfig) -> Self {
        Self {
            provider: Ok(provider),
            model: config.model.clone(),
            options: Self::options_from(config),
        }
    }

    fn options_from(config: &AppConfig) -> ChatOptions {
        ChatOptions {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        }
    }

    #[cfg(test)]
    pub fn is_configured(&self) -> bool {
        self.provider.is_ok()
    }

    /// 服务不可用的原因（已配置时为 None）
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.provider.as_ref().err().map(String::as_str)
    }

    /// 单次补全，不重试
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let provider = self
            .provider
            .as_ref()
            .map_err(|reason| LlmError::ConfigError(reason.clone()))?;

        provider.complete(messages, &self.model, &self.options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::RecordingProvider;

    #[tokio::test]
    async fn test_unconfigured_service_reports_config_error() {
        let service = LlmService::from_config(&AppConfig::default());
        assert!(!service.is_configured());

        let err = service
            .complete(vec![ChatMessage::user("Hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ConfigError(_)));
        assert_eq!(service.unavailable_reason(), Some(MISSING_API_KEY));
    }

    #[tokio::test]
    async fn test_client_build_failure_keeps_real_reason() {
        let config = AppConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        let service = LlmService::from_config(&config);
        assert!(!service.is_configured());

        let reason = service.unavailable_reason().unwrap();
        assert!(reason.contains("API Key is required"), "reason: {}", reason);
        assert!(!reason.contains(MISSING_API_KEY));

        match service.complete(vec![ChatMessage::user("Hi")]).await {
            Err(LlmError::ConfigError(msg)) => assert_eq!(msg, reason),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_configured_from_api_key() {
        let config = AppConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(LlmService::from_config(&config).is_configured());
    }

    #[tokio::test]
    async fn test_fixed_model_and_options_forwarded() {
        let provider = Arc::new(RecordingProvider::replying("ok"));
        let service = LlmService::with_provider(provider.clone(), &AppConfig::default());

        service
            .complete(vec![ChatMessage::user("Hi")])
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gpt-4o-mini");
        assert_eq!(
            calls[0].options,
            ChatOptions {
                temperature: Some(0.7),
                max_tokens: Some(300),
            }
        );
    }
}
