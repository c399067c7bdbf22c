use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

/** \brief Azure Static Web Apps 注入的身份头。 */
pub const PRINCIPAL_HEADER: &str = "x-ms-client-principal";

/**
 * \brief 平台注入的调用方身份，仅用于日志归属，不参与鉴权。
 */
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[serde(default)]
    pub identity_provider: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /** \brief 展示名（通常是邮箱），日志归属使用。 */
    #[serde(default)]
    pub user_details: Option<String>,
    #[serde(default)]
    pub user_roles: Vec<String>,
}

/**
 * \brief 从请求头解码身份；头缺失或解码失败一律返回 None，绝不使请求失败。
 */
pub fn principal_from_headers(headers: &HeaderMap) -> Option<Principal> {
    let raw = headers.get(PRINCIPAL_HEADER)?.to_str().ok()?;
    decode_principal(raw)
}

/**
 * \brief 解码 base64 + JSON 编码的身份载荷。
 */
pub fn decode_principal(raw: &str) -> Option<Principal> {
    let bytes = STANDARD.decode(raw.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/**
 * \brief 日志归属标签：userDetails，缺失时为 "anonymous"。
 */
pub fn attribution_label(principal: Option<&Principal>) -> String {
    principal
        .and_then(|p| p.user_details.clone())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}
