use crate::error::ChatError;

pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
pub const DEFAULT_API_VERSION: &str = "2024-12-01-preview";

/**
 * \brief Azure OpenAI 连接配置，每次调用重新解析，不做进程级缓存。
 */
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /** \brief 资源端点，如 https://xxx.openai.azure.com */
    pub endpoint: String,
    /** \brief API Key（密钥，不得出现在响应或日志中） */
    pub api_key: String,
    /** \brief 部署名 */
    pub deployment: String,
    /** \brief API 版本 */
    pub api_version: String,
}

impl ChatConfig {
    /**
     * \brief 从进程环境变量解析配置。
     */
    pub fn from_env() -> Result<Self, ChatError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /**
     * \brief 通过查找函数解析配置，便于测试注入。
     * \details endpoint 与 api_key 必需，空白视为缺失，所有缺失项聚合到
     *          同一个错误；deployment 与 api_version 有内置默认值。
     */
    pub fn resolve<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty());
        let api_key = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        if endpoint.is_none() {
            missing.push(ENV_ENDPOINT.to_string());
        }
        if api_key.is_none() {
            missing.push(ENV_API_KEY.to_string());
        }

        match (endpoint, api_key) {
            (Some(endpoint), Some(api_key)) => Ok(Self {
                endpoint,
                api_key,
                deployment: lookup(ENV_DEPLOYMENT)
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string()),
                api_version: lookup(ENV_API_VERSION)
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            }),
            _ => Err(ChatError::MissingConfig { missing }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(map: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_resolve_applies_defaults_for_optional_vars() {
        let lookup = lookup_from(HashMap::from([
            (ENV_ENDPOINT, "https://example.openai.azure.com"),
            (ENV_API_KEY, "secret"),
        ]));
        let config = ChatConfig::resolve(lookup).expect("resolve");
        assert_eq!(config.endpoint, "https://example.openai.azure.com");
        assert_eq!(config.deployment, DEFAULT_DEPLOYMENT);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_resolve_honors_explicit_optional_vars() {
        let lookup = lookup_from(HashMap::from([
            (ENV_ENDPOINT, "https://example.openai.azure.com"),
            (ENV_API_KEY, "secret"),
            (ENV_DEPLOYMENT, "gpt-5-nano"),
            (ENV_API_VERSION, "2025-01-01"),
        ]));
        let config = ChatConfig::resolve(lookup).expect("resolve");
        assert_eq!(config.deployment, "gpt-5-nano");
        assert_eq!(config.api_version, "2025-01-01");
    }

    #[test]
    fn test_resolve_aggregates_all_missing_required_vars() {
        let err = ChatConfig::resolve(|_| None).expect_err("nothing set");
        match err {
            ChatError::MissingConfig { missing } => {
                assert_eq!(missing, vec![ENV_ENDPOINT.to_string(), ENV_API_KEY.to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_treats_blank_required_var_as_missing() {
        let lookup = lookup_from(HashMap::from([
            (ENV_ENDPOINT, "   "),
            (ENV_API_KEY, "secret"),
        ]));
        let err = ChatConfig::resolve(lookup).expect_err("blank endpoint");
        match err {
            ChatError::MissingConfig { missing } => {
                assert_eq!(missing, vec![ENV_ENDPOINT.to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
