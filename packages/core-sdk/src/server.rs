use anyhow::Result;
use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::{get_service, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::{
    auth,
    config::ChatConfig,
    error::ChatError,
    llm,
    models::{ChatReply, ChatRequest, ErrorBody},
    telemetry,
};

/**
 * \brief 启动本地 HTTP 服务，提供静态前端与 /api/chat 接口。
 * \param addr 监听地址，如 "127.0.0.1:8787"
 */
pub async fn run(addr: &str) -> Result<()> {
    let ui_root = std::env::var("CHATRELAY_UI_DIR").unwrap_or_else(|_| "dist".to_string());
    let fallback_root =
        std::env::var("CHATRELAY_UI_FALLBACK").unwrap_or_else(|_| "web".to_string());

    let static_handler = if std::path::Path::new(&ui_root).exists() {
        ServeDir::new(ui_root)
    } else {
        ServeDir::new(fallback_root)
    }
    .append_index_html_on_directories(true);

    let static_service = get_service(static_handler);

    let app = Router::new()
        .route("/api/chat", post(chat))
        .fallback_service(static_service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/**
 * \brief POST /api/chat 入口，配置来源固定为进程环境变量。
 */
async fn chat(headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    handle_chat(|key| std::env::var(key).ok(), &headers, &body).await
}

/**
 * \brief 处理一次聊天请求，所有错误在此边界转换为 JSON 响应。
 * \param lookup 配置查找函数，测试可注入替身
 * \details 每条路径恰好产生一个响应；5xx 记入错误日志，Provider 细节
 *          不回显给调用方。
 */
pub async fn handle_chat<F>(lookup: F, headers: &HeaderMap, body: &[u8]) -> (StatusCode, Json<Value>)
where
    F: Fn(&str) -> Option<String>,
{
    match run_chat(lookup, headers, body).await {
        Ok(reply) => (StatusCode::OK, Json(json!(ChatReply { reply }))),
        Err(err) => {
            if err.status().is_server_error() {
                telemetry::log_error("server.chat", err.kind(), &err.log_detail());
            }
            let body = ErrorBody {
                error: err.to_string(),
            };
            (err.status(), Json(json!(body)))
        }
    }
}

async fn run_chat<F>(
    lookup: F,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Option<String>, ChatError>
where
    F: Fn(&str) -> Option<String>,
{
    let request: ChatRequest = serde_json::from_slice(body).map_err(|_| ChatError::InvalidBody)?;
    let messages = request.into_messages()?;

    // 身份头只影响日志归属，解码失败不影响请求本身
    let principal = auth::principal_from_headers(headers);
    telemetry::log_event(
        "server.chat",
        &format!(
            "user={} messages={}",
            auth::attribution_label(principal.as_ref()),
            messages.len()
        ),
    );

    let config = ChatConfig::resolve(lookup)?;
    let reply = llm::chat_completion(&config, &messages).await?;
    Ok(reply)
}
