//! 服务层模块

mod chat_relay;
mod llm_service;
mod prompt_service;

pub use chat_relay::ChatRelay;
pub use llm_service::LlmService;
pub use prompt_service::PromptService;
