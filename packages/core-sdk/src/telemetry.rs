use std::{fs::OpenOptions, io::Write, path::PathBuf};

use anyhow::Result;
use once_cell::sync::Lazy;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

// 默认开启；CHATRELAY_LOG=0 可关闭
static TELEMETRY_ENABLED: Lazy<std::sync::RwLock<bool>> = Lazy::new(|| {
    let enabled = std::env::var("CHATRELAY_LOG")
        .map(|v| v != "0")
        .unwrap_or(true);
    std::sync::RwLock::new(enabled)
});

/**
 * \brief 更新日志开关状态。
 */
pub fn set_enabled(enabled: bool) {
    if let Ok(mut guard) = TELEMETRY_ENABLED.write() {
        *guard = enabled;
    }
}

/**
 * \brief 查询当前日志开关状态。
 */
pub fn is_enabled() -> bool {
    TELEMETRY_ENABLED.read().map(|g| *g).unwrap_or(false)
}

/**
 * \brief 记录常规事件。
 */
pub fn log_event(category: &str, message: &str) {
    if !is_enabled() {
        return;
    }
    if let Err(err) = write_line("INFO", category, None, message) {
        eprintln!("telemetry write failed: {}", err);
    }
}

/**
 * \brief 记录错误事件，kind 为稳定的错误分类标签。
 */
pub fn log_error(category: &str, kind: &str, message: &str) {
    if !is_enabled() {
        return;
    }
    if let Err(err) = write_line("ERROR", category, Some(kind), message) {
        eprintln!("telemetry write failed: {}", err);
    }
}

/**
 * \brief 拼装单行日志；错误行带 kind= 字段。
 */
fn format_line(
    timestamp: &str,
    level: &str,
    category: &str,
    kind: Option<&str>,
    message: &str,
) -> String {
    match kind {
        Some(kind) => format!(
            "{} [{}] {} kind={} - {}",
            timestamp, level, category, kind, message
        ),
        None => format!("{} [{}] {} - {}", timestamp, level, category, message),
    }
}

fn write_line(level: &str, category: &str, kind: Option<&str>, message: &str) -> Result<()> {
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
    }
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("chatrelay.log"))?;
    writeln!(
        file,
        "{}",
        format_line(&timestamp, level, category, kind, message)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_line_has_no_kind_field() {
        let line = format_line(
            "2026-08-24T00:00:00Z",
            "INFO",
            "server.chat",
            None,
            "user=anonymous messages=1",
        );
        assert_eq!(
            line,
            "2026-08-24T00:00:00Z [INFO] server.chat - user=anonymous messages=1"
        );
    }

    #[test]
    fn test_error_line_carries_kind_field() {
        let line = format_line(
            "2026-08-24T00:00:00Z",
            "ERROR",
            "server.chat",
            Some("provider"),
            "provider returned 429: too many requests",
        );
        assert_eq!(
            line,
            "2026-08-24T00:00:00Z [ERROR] server.chat kind=provider - provider returned 429: too many requests"
        );
    }
}
