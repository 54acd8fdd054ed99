//! 聊天小部件客户端
//!
//! 维护只用于展示的消息序列（只追加，不重排、不截断）。每次发送只携带
//! 最新一条消息，展示历史不会发给服务端。同一时间最多一个请求在途。

mod terminal;
mod transport;

pub use terminal::run_terminal;
pub use transport::{HttpRelayTransport, RelayTransport};
#[cfg(test)]
use transport::RelayError;

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// 初始问候语
pub const GREETING: &str =
    "Hello! I'm Ramakant's AI assistant. Ask me about his projects, skills, or experience.";

/// 请求失败时展示的固定回复
pub const FALLBACK_REPLY: &str =
    "I apologize, but I'm having trouble connecting right now. Please try again later.";

/// 展示角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// 展示条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    pub role: Role,
    pub content: String,
}

impl DisplayMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// 一次发送的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// 收到回复并已追加
    Replied,
    /// 请求失败，已追加固定回复
    Fallback,
    /// 输入为空、已有请求在途或已卸载，什么也没做
    Ignored,
    /// 小部件在等待期间被卸载，迟到的回复被丢弃
    Dropped,
}

/// 离开作用域时清除 busy 标志
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 聊天小部件
pub struct ChatWidget<T> {
    transport: T,
    messages: Mutex<Vec<DisplayMessage>>,
    input: Mutex<String>,
    busy: AtomicBool,
    mounted: AtomicBool,
}

impl<T: RelayTransport> ChatWidget<T> {
    /// 以默认问候语创建
    pub fn new(transport: T) -> Self {
        Self::with_greeting(transport, GREETING)
    }

    pub fn with_greeting(transport: T, greeting: impl Into<String>) -> Self {
        Self {
            transport,
            messages: Mutex::new(vec![DisplayMessage::assistant(greeting)]),
            input: Mutex::new(String::new()),
            busy: AtomicBool::new(false),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.lock() = text.into();
    }

    #[cfg(test)]
    pub fn input(&self) -> String {
        self.input.lock().clone()
    }

    /// 当前展示序列的快照
    pub fn messages(&self) -> Vec<DisplayMessage> {
        self.messages.lock().clone()
    }

    /// 是否有请求在途（用于显示忙碌指示）
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// 关闭小部件。在途请求不取消，其回复到达后被丢弃。
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    fn push(&self, message: DisplayMessage) {
        self.messages.lock().push(message);
    }

    /// 发送当前输入
    pub async fn send(&self) -> SendOutcome {
        let text = self.input.lock().trim().to_string();
        if text.is_empty() || !self.is_mounted() {
            return SendOutcome::Ignored;
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Send ignored: a reply is still pending");
            return SendOutcome::Ignored;
        }
        let _busy = BusyGuard(&self.busy);

        self.input.lock().clear();
        self.push(DisplayMessage::user(text.clone()));

        let result = self.transport.send(&text).await;

        if !self.is_mounted() {
            debug!("Widget unmounted; dropping late reply");
            return SendOutcome::Dropped;
        }

        match result {
            Ok(reply) => {
                self.push(DisplayMessage::assistant(reply));
                SendOutcome::Replied
            }
            Err(e) => {
                warn!("Chat error: {}", e);
                self.push(DisplayMessage::assistant(FALLBACK_REPLY));
                SendOutcome::Fallback
            }
        }
    }
}
