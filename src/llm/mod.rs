//! LLM 模块
//!
//! 提供 OpenAI 兼容的补全客户端，以及中继依赖的 `ChatProvider` 抽象。

mod client;
mod format;
mod openai;
mod provider;
mod types;

pub use client::LlmClient;
pub use provider::ChatProvider;
pub use types::*;

#[cfg(test)]
pub(crate) use provider::testing;
