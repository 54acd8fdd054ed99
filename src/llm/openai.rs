//! OpenAI Chat Completions API 实现（非流式）

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::format::build_openai_endpoint;
use super::types::{ChatMessage, ChatOptions, LlmError};

/// 上游错误正文保留的最大长度
const MAX_ERROR_BODY_CHARS: usize = 500;

/// OpenAI 请求载荷
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI 响应
#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    content: Option<String>,
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::HttpError(e)
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// 调用 OpenAI API，返回第一个候选的文本
pub async fn complete_openai(
    client: &Client,
    api_key: &str,
    base_url: &str,
    messages: &[ChatMessage],
    model: &str,
    options: &ChatOptions,
) -> Result<String, LlmError> {
    let endpoint = build_openai_endpoint(base_url);

    let payload = OpenAiRequest {
        model,
        messages,
        temperature: options.temperature,
        max_tokens: options.max_tokens,
    };

    debug!("OpenAI API request: endpoint={}, model={}", endpoint, model);

    let response = client
        .post(&endpoint)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
        .map_err(map_transport_error)?;

    // 检查状态码
    let status = response.status();
    if !status.is_success() {
        let status_code = status.as_u16();
        let error_text = response.text().await.unwrap_or_default();
        let message = truncate_chars(&error_text, MAX_ERROR_BODY_CHARS).to_string();
        error!("OpenAI API error: status={}, body={}", status_code, message);
        return Err(LlmError::ApiError {
            status: status_code,
            message,
        });
    }

    let body = response.text().await.map_err(map_transport_error)?;
    let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
        error!("Failed to parse OpenAI response: {}", e);
        LlmError::JsonError(e)
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LlmError::EmptyResponse)
}

/// 进程内的 chat-completions 模拟上游
#[cfg(test)]
pub(crate) mod test_upstream {
    use axum::{
        extract::State,
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    /// 上游收到的一次请求
    #[derive(Debug, Clone)]
    pub struct SeenRequest {
        pub authorization: Option<String>,
        pub body: Value,
    }

    #[derive(Clone)]
    pub struct MockUpstream {
        status: StatusCode,
        body: String,
        delay: Duration,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    impl MockUpstream {
        pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                delay: Duration::ZERO,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// 以给定文本作为唯一候选的成功响应
        pub fn completion(content: &str) -> Self {
            let body = serde_json::json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            });
            Self::new(StatusCode::OK, body.to_string())
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn seen(&self) -> Vec<SeenRequest> {
            self.seen.lock().clone()
        }

        /// 绑定随机端口并返回 base_url
        pub async fn spawn(&self) -> String {
            let app = Router::new()
                .route("/v1/chat/completions", post(handle_completion))
                .with_state(self.clone());
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{}", addr)
        }
    }

    async fn handle_completion(
        State(upstream): State<MockUpstream>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        upstream.seen.lock().push(SeenRequest {
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
        if !upstream.delay.is_zero() {
            tokio::time::sleep(upstream.delay).await;
        }
        (upstream.status, upstream.body.clone())
    }
}
