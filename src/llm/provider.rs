//! 上游模型调用抽象
//!
//! 中继只依赖这个 trait，测试中用记录型替身代替真实的 HTTP 调用。

use async_trait::async_trait;

use super::types::{ChatMessage, ChatOptions, LlmError};

/// 给定消息列表，返回第一条补全文本
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: &ChatOptions,
    ) -> Result<String, LlmError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;

    /// 一次被记录的调用
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub messages: Vec<ChatMessage>,
        pub model: String,
        pub options: ChatOptions,
    }

    enum Scripted {
        Reply(String),
        ApiError { status: u16, message: String },
        Timeout,
    }

    /// 记录所有调用并按预设结果返回
    pub struct RecordingProvider {
        scripted: Scripted,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl RecordingProvider {
        pub fn replying(reply: impl Into<String>) -> Self {
            Self::new(Scripted::Reply(reply.into()))
        }

        pub fn failing(status: u16, message: impl Into<String>) -> Self {
            Self::new(Scripted::ApiError {
                status,
                message: message.into(),
            })
        }

        pub fn timing_out() -> Self {
            Self::new(Scripted::Timeout)
        }

        fn new(scripted: Scripted) -> Self {
            Self {
                scripted,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl ChatProvider for RecordingProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            model: &str,
            options: &ChatOptions,
        ) -> Result<String, LlmError> {
            self.calls.lock().push(RecordedCall {
                messages,
                model: model.to_string(),
                options: options.clone(),
            });

            match &self.scripted {
                Scripted::Reply(reply) => Ok(reply.clone()),
                Scripted::ApiError { status, message } => Err(LlmError::ApiError {
                    status: *status,
                    message: message.clone(),
                }),
                Scripted::Timeout => Err(LlmError::Timeout),
            }
        }
    }
}
