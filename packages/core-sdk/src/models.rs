use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::llm;

/**
 * \brief 消息结构，与 OpenAI Chat 消息格式对齐。
 */
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /** \brief 角色：system/user/assistant */
    pub role: String,
    /** \brief 内容 */
    pub content: String,
}

impl Message {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/**
 * \brief 入站聊天请求体。
 * \details 当前前端发送 `messages` 数组；旧版前端发送单个 `message` 字符串，
 *          两种形状都接受。
 */
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /** \brief 完整对话历史（首选形状）。 */
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    /** \brief 单条用户消息（旧版形状）。 */
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    /**
     * \brief 校验请求并归一化为发送给 Provider 的消息列表。
     * \details `messages` 数组原样转发，不做逐元素校验；旧版单条消息
     *          会包装为 system + user 两条。空数组不回退到 `message`。
     */
    pub fn into_messages(self) -> Result<Vec<Message>, ChatError> {
        match (self.messages, self.message) {
            (Some(messages), _) => {
                if messages.is_empty() {
                    Err(ChatError::MissingMessages)
                } else {
                    Ok(messages)
                }
            }
            (None, Some(message)) => {
                let trimmed = message.trim();
                if trimmed.is_empty() {
                    Err(ChatError::EmptyMessage)
                } else {
                    Ok(vec![
                        Message::new("system", llm::SYSTEM_PROMPT),
                        Message::new("user", trimmed),
                    ])
                }
            }
            (None, None) => Err(ChatError::MissingMessages),
        }
    }
}

/**
 * \brief 成功响应体：`{"reply": ...}`，内容可能为 null。
 */
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: Option<String>,
}

/**
 * \brief 错误响应体：`{"error": ...}`。
 */
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
