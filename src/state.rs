//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。启动后只读，请求之间不共享可变数据。

use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::services::{ChatRelay, LlmService, PromptService};

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 聊天中继
    pub relay: ChatRelay,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(relay: ChatRelay) -> Self {
        Self { relay }
    }

    /// 按配置创建：加载人设并构建上游客户端
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let prompt = PromptService::from_config(config)?;
        info!(
            "Persona prompt loaded: chars={}",
            prompt.system_prompt().chars().count()
        );
        let llm = LlmService::from_config(config);
        Ok(Self::new(ChatRelay::new(prompt, llm)))
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state(config: &AppConfig) -> AppResult<Arc<AppState>> {
    AppState::from_config(config).map(Arc::new)
}
