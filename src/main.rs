//! # Usage Ledger 主程序
//!
//! 使用日志查询、统计与导出服务

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use usage_ledger::{
    config::ConfigManager,
    database, lerror, linfo,
    logging::{self, LogComponent, LogStage},
    management::{ManagementServer, ManagementState},
    usage::SeaOrmLogStore,
};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "usage-ledger", version, about)]
struct Cli {
    /// 配置文件路径，缺省时按 `RUST_ENV` 选择 config/config.{env}.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别（trace/debug/info/warn/error）
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    logging::init_optimized_logging(cli.log_level.as_ref());

    if let Err(e) = run(cli).await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Main,
            "service_start_failed",
            &format!("服务启动失败: {e:?}")
        );
        return Err(e);
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_manager = match cli.config {
        Some(path) => ConfigManager::from_file(path),
        None => ConfigManager::new(),
    }
    .map_err(|e| anyhow::anyhow!("配置加载失败: {e}"))?;

    let app_config = config_manager.into_config();

    let db = database::init_database(&app_config.database)
        .await
        .map_err(|e| anyhow::anyhow!("数据库连接失败: {e}"))?;

    let pending = database::check_database_status(&db)
        .await
        .map_err(|e| anyhow::anyhow!("数据库状态检查失败: {e}"))?;
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "run_migrations",
        "执行数据库迁移...",
        pending = pending,
    );
    database::run_migrations(&db)
        .await
        .map_err(|e| anyhow::anyhow!("数据库迁移失败: {e}"))?;

    let store = Arc::new(SeaOrmLogStore::new(Arc::new(db)));
    let state = ManagementState::new(Arc::new(app_config), store);

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "服务启动"
    );
    ManagementServer::new(state).serve().await?;
    Ok(())
}
