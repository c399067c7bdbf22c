use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use chatrelay_core_sdk::{config::ChatConfig, llm, models::Message, server, telemetry};

/**
 * \brief CLI 程序入口：启动服务或从终端直接对话。
 */
#[derive(Parser, Debug)]
#[command(name = "chatrelay", version, about = "Azure OpenAI chat relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /**
     * \brief 启动本地 HTTP 服务并提供前端页面。
     */
    Serve {
        #[arg(long, default_value = "127.0.0.1:8787")]
        addr: String,
        /** \brief 关闭文件日志。 */
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },

    /**
     * \brief 发送一条用户消息并打印模型回复。
     */
    Chat {
        #[arg(long)]
        prompt: String,
    },

    /**
     * \brief 检查环境变量配置是否可用（不输出密钥）。
     */
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, quiet } => {
            if quiet {
                telemetry::set_enabled(false);
            }
            server::run(&addr).await?;
        }
        Commands::Chat { prompt } => {
            let trimmed = prompt.trim();
            if trimmed.is_empty() {
                bail!("メッセージが空です");
            }
            let config = ChatConfig::from_env().context("load Azure OpenAI settings failed")?;
            let messages = vec![
                Message::new("system", llm::SYSTEM_PROMPT),
                Message::new("user", trimmed),
            ];
            telemetry::log_event(
                "cli.chat",
                &format!(
                    "deployment={} prompt_len={}",
                    config.deployment,
                    trimmed.len()
                ),
            );
            let reply = llm::chat_completion(&config, &messages)
                .await
                .context("chat completion failed")?;
            println!("{}", reply.unwrap_or_default());
        }
        Commands::Check => match ChatConfig::from_env() {
            Ok(config) => {
                println!("endpoint    = {}", config.endpoint);
                println!("deployment  = {}", config.deployment);
                println!("api-version = {}", config.api_version);
                println!("api-key     = set");
            }
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
