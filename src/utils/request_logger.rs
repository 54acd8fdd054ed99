//! LLM 请求日志记录器
//!
//! 通过 tracing 记录每次上游调用的摘要（模型、消息数、脱敏密钥、耗时、结果），
//! 不落盘。

use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::llm::LlmError;

/// 生成请求 ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// API 密钥脱敏
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// 一次上游调用的日志条目
#[derive(Debug)]
pub struct RequestLog {
    model: String,
    messages_count: usize,
    api_key_masked: String,
    started: Instant,
}

impl RequestLog {
    /// 记录请求开始
    pub fn start(model: &str, messages_count: usize, api_key: &str) -> Self {
        let entry = Self {
            model: model.to_string(),
            messages_count,
            api_key_masked: mask_api_key(api_key),
            started: Instant::now(),
        };
        info!(
            "LLM request: model={}, messages={}, key={}",
            entry.model, entry.messages_count, entry.api_key_masked
        );
        entry
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// 记录成功
    pub fn log_success(self, response_length: usize) {
        info!(
            "LLM response: model={}, duration_ms={}, response_length={}",
            self.model,
            self.elapsed_ms(),
            response_length
        );
    }

    /// 记录错误（只记类型和状态码，上游正文由调用方记录）
    pub fn log_error(self, err: &LlmError) {
        error!(
            "LLM request failed: model={}, duration_ms={}, error_type={}, status_code={:?}",
            self.model,
            self.elapsed_ms(),
            err.kind(),
            err.status_code()
        );
    }
}
