//! 聊天中继
//!
//! 把一条用户消息和人设提示词一起转发给上游模型，并把结果映射为应用错误。

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::llm::LlmError;
use crate::services::{LlmService, PromptService};

/// 无状态中继，每次调用相互独立
#[derive(Clone)]
pub struct ChatRelay {
    prompt: PromptService,
    llm: LlmService,
}

impl ChatRelay {
    pub fn new(prompt: PromptService, llm: LlmService) -> Self {
        Self { prompt, llm }
    }

    /// 转发一条消息，返回第一条补全文本（原样）
    pub async fn relay(&self, message: &str) -> AppResult<String> {
        if let Some(reason) = self.llm.unavailable_reason() {
            return Err(AppError::Config(reason.to_string()));
        }

        let messages = self.prompt.build_chat_messages(message);
        debug!("Forwarding chat message: chars={}", message.chars().count());

        self.llm.complete(messages).await.map_err(|e| match e {
            LlmError::ConfigError(msg) => AppError::Config(msg),
            other => AppError::Llm(other),
        })
    }
}
