use axum::http::StatusCode;
use thiserror::Error;

use crate::llm::ProviderError;

/**
 * \brief 处理单个聊天请求时可能出现的全部错误。
 * \details Display 文本即返回给调用方的 `error` 字段；Provider 的详细
 *          原因只进日志，不回显给调用方。
 */
#[derive(Debug, Error)]
pub enum ChatError {
    /** \brief 请求体缺失或不是合法 JSON。 */
    #[error("リクエストボディが不正です")]
    InvalidBody,

    /** \brief 旧版单条消息去除空白后为空。 */
    #[error("メッセージが空です")]
    EmptyMessage,

    /** \brief `messages` 缺失或为空数组。 */
    #[error("messages を指定してください")]
    MissingMessages,

    /** \brief 必需环境变量缺失，消息列出全部缺失项（不含取值）。 */
    #[error("サーバー設定エラー: {} が設定されていません", .missing.join(", "))]
    MissingConfig { missing: Vec<String> },

    /** \brief 外呼 Azure OpenAI 失败。 */
    #[error("AI 応答の取得に失敗しました")]
    Provider(#[from] ProviderError),
}

impl ChatError {
    /**
     * \brief 映射到 HTTP 状态码：输入错误 400，其余 500。
     */
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::InvalidBody | ChatError::EmptyMessage | ChatError::MissingMessages => {
                StatusCode::BAD_REQUEST
            }
            ChatError::MissingConfig { .. } | ChatError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /** \brief 错误日志中使用的稳定分类标签。 */
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::InvalidBody => "invalid_body",
            ChatError::EmptyMessage => "empty_message",
            ChatError::MissingMessages => "missing_messages",
            ChatError::MissingConfig { .. } => "missing_config",
            ChatError::Provider(_) => "provider",
        }
    }

    /**
     * \brief 日志专用的完整描述；Provider 错误展开底层原因。
     */
    pub fn log_detail(&self) -> String {
        match self {
            ChatError::Provider(source) => source.to_string(),
            other => other.to_string(),
        }
    }
}
