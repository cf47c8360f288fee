use anyhow::Context;
use clap::Parser;
use meeting_prep::app::build_state;
use meeting_prep::core::ConfigProvider;
use meeting_prep::utils::{logger, validation::Validate};
use meeting_prep::{ApiServer, ApiServerConfig, CliConfig};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting meeting-prep service v{}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match cli.load_toml().context("failed to load config file")? {
        Some(config) => serve(config).await,
        None => serve(cli).await,
    }
}

async fn serve<C: ConfigProvider + Validate + 'static>(config: C) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitoring_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }
    if let Some(dir) = config.archive_dir() {
        tracing::info!("💾 Archiving briefings to: {}", dir);
    }

    let bind_address: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.bind_address()))?;

    let state = build_state(config)?;
    ApiServer::new(state, ApiServerConfig { bind_address })
        .run()
        .await?;

    Ok(())
}
