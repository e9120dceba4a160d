//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;
mod database;
mod manager;

pub use app_config::{AppConfig, LogsConfig, ServerConfig};
pub use database::DatabaseConfig;
pub use manager::ConfigManager;

use crate::error::Result;
use crate::{ensure, error};

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<()> {
    ensure!(
        config.server.port != 0,
        Config,
        "无效的服务器端口: {}",
        config.server.port
    );
    ensure!(
        config.server.api_prefix.starts_with('/'),
        Config,
        "API 前缀必须以 / 开头: {}",
        config.server.api_prefix
    );
    ensure!(
        config.server.api_prefix.len() > 1 && !config.server.api_prefix.ends_with('/'),
        Config,
        "API 前缀不能为根路径或以 / 结尾: {}",
        config.server.api_prefix
    );

    ensure!(!config.database.url.is_empty(), Config, "数据库URL不能为空");
    ensure!(
        config.database.max_connections > 0,
        Config,
        "数据库最大连接数必须大于0"
    );

    ensure!(
        config.auth.jwt_secret.len() >= crate::auth::MIN_JWT_SECRET_LEN,
        Config,
        "JWT 密钥长度至少为 {} 个字符",
        crate::auth::MIN_JWT_SECRET_LEN
    );
    ensure!(config.auth.jwt_expires_in > 0, Config, "JWT 有效期必须大于0");

    let logs = &config.logs;
    if !(logs.quota_per_unit.is_finite() && logs.quota_per_unit > 0.0) {
        return Err(error!(Config, "quota_per_unit 必须为正数: {}", logs.quota_per_unit));
    }
    ensure!(logs.export_max_rows > 0, Config, "export_max_rows 必须大于0");
    ensure!(logs.delete_batch_size > 0, Config, "delete_batch_size 必须大于0");
    ensure!(logs.search_limit > 0, Config, "search_limit 必须大于0");
    ensure!(logs.rate_window_secs > 0, Config, "rate_window_secs 必须大于0");
    ensure!(
        logs.default_page_size > 0 && logs.default_page_size <= logs.max_page_size,
        Config,
        "分页大小配置无效: default={}, max={}",
        logs.default_page_size,
        logs.max_page_size
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "x".repeat(crate::auth::MIN_JWT_SECRET_LEN);
        config
    }

    #[test]
    fn test_default_config_with_secret_is_valid() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_short_secret() {
        let mut config = valid_config();
        config.auth.jwt_secret = "short".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let mut config = valid_config();
        config.logs.delete_batch_size = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("delete_batch_size"));
    }

    #[test]
    fn test_rejects_non_positive_exchange_rate() {
        let mut config = valid_config();
        config.logs.quota_per_unit = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_root_api_prefix() {
        for prefix in ["/", "api", "/api/"] {
            let mut config = valid_config();
            config.server.api_prefix = prefix.to_string();
            assert!(validate_config(&config).is_err(), "prefix {prefix} accepted");
        }
    }
}
