//! 应用配置管理
//!
//! 配置分两层加载：先读取可执行文件同级目录下的 config.json（可选），
//! 再用环境变量覆盖。API 密钥只从环境变量读取，不会写入或读取配置文件。

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// 获取配置文件路径
fn get_config_path() -> PathBuf {
    // 配置文件位于可执行文件同级目录
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API 密钥（来自 OPENAI_API_KEY）
    #[serde(skip)]
    pub api_key: Option<String>,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// 单次回复的最大 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 上游请求总超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// 上游连接超时（秒）
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// 监听地址
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// 前端静态文件目录
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// 人设提示词文件，未设置时使用内置文本
    #[serde(default)]
    pub persona_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    300
}

fn default_request_timeout_secs() -> u64 {
    8
}

fn default_connect_timeout_secs() -> u64 {
    3
}

fn default_bind_addr() -> String {
    "127.0.0.1:8888".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            persona_path: None,
        }
    }
}

// 密钥不进日志
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key_set", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("static_dir", &self.static_dir)
            .field("persona_path", &self.persona_path)
            .finish()
    }
}

impl AppConfig {
    /// 从配置文件和进程环境加载配置
    pub fn load() -> Self {
        let mut config = load_config_from_file().unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// 用环境变量覆盖配置
    ///
    /// 空字符串（含仅空白）视为未设置。
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        self.api_key = read("OPENAI_API_KEY");
        if let Some(base_url) = read("OPENAI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(model) = read("OPENAI_MODEL") {
            self.model = model;
        }
        if let Some(bind_addr) = read("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Some(static_dir) = read("STATIC_DIR") {
            self.static_dir = PathBuf::from(static_dir);
        }
        if let Some(persona_path) = read("PERSONA_PATH") {
            self.persona_path = Some(PathBuf::from(persona_path));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// 全局配置单例
static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

/// 从文件加载配置
fn load_config_from_file() -> Option<AppConfig> {
    let path = get_config_path();
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}

/// 获取当前配置
///
/// 首次调用时加载，之后在进程生命周期内不变。
pub fn get_config() -> &'static AppConfig {
    &CONFIG
}
