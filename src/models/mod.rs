//! 数据模型

mod api;

pub use api::{ChatReply, ChatRequest};
