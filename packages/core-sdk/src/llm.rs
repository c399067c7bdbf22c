use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::ChatConfig;
use crate::models::Message;

/** \brief 旧版单条消息形状使用的系统提示词。 */
pub const SYSTEM_PROMPT: &str = "あなたは親切なアシスタントです。";

/** \brief 回复长度上限。 */
const MAX_TOKENS: u32 = 1024;

/**
 * \brief 外呼 Azure OpenAI 的失败分类；详细内容只进日志。
 */
#[derive(Debug, Error)]
pub enum ProviderError {
    /** \brief 连接、超时或响应体读取失败。 */
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /** \brief Provider 返回非 2xx，附带响应文本。 */
    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /** \brief 响应是 JSON 但缺少 choices[0].message。 */
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/**
 * \brief 拼接部署级 chat completions 地址。
 */
pub fn chat_completions_url(config: &ChatConfig) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        config.endpoint.trim_end_matches('/'),
        config.deployment,
        config.api_version
    )
}

/**
 * \brief 发送一次 chat completions 调用，返回首个 choice 的内容。
 * \details 客户端每次调用重新构建，不做重试，消息列表原样转发；
 *          内容为 null 时透传 None。
 */
pub async fn chat_completion(
    config: &ChatConfig,
    messages: &[Message],
) -> Result<Option<String>, ProviderError> {
    let client = reqwest::Client::builder().build()?;
    let body = json!({
        "messages": messages,
        "max_tokens": MAX_TOKENS,
    });

    let resp = client
        .post(chat_completions_url(config))
        .header(CONTENT_TYPE, "application/json")
        .header("api-key", &config.api_key)
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Status { status, body: text });
    }

    let v: Value = resp.json().await?;
    extract_reply(&v)
}

fn extract_reply(v: &Value) -> Result<Option<String>, ProviderError> {
    let message = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| ProviderError::Malformed(v.to_string()))?;
    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}
