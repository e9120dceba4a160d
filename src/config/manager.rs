//! # 配置管理器
//!
//! 读取 TOML 配置文件，叠加 `LEDGER_` 前缀的环境变量后校验。

use super::AppConfig;
use crate::error::{Context, LedgerError, Result};
use crate::{
    ldebug, linfo,
    logging::{LogComponent, LogStage},
};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ENV_PREFIX: &str = "LEDGER_";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    source: PathBuf,
}

impl ConfigManager {
    /// 按 `USAGE_LEDGER_CONFIG_PATH` 或 `config/config.{RUST_ENV}.toml` 加载
    pub fn new() -> Result<Self> {
        let config_file = env::var("USAGE_LEDGER_CONFIG_PATH").map_or_else(
            |_| {
                let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
                PathBuf::from(format!("config/config.{env}.toml"))
            },
            PathBuf::from,
        );
        let display = config_file.display().to_string();
        Self::from_file(&config_file).with_context(|| format!("加载默认配置 {display}"))
    }

    /// 从指定文件加载，并应用当前进程的环境变量覆盖
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_overrides(config_path, Self::build_env_overrides())
    }

    /// 从指定文件加载，并应用给定的覆盖项
    pub fn from_file_with_overrides(
        config_path: impl AsRef<Path>,
        overrides: HashMap<String, String>,
    ) -> Result<Self> {
        let path = config_path.as_ref();
        let mut config = Self::load_config_file(path)?;
        Self::apply_overrides(&mut config, &overrides)?;
        super::validate_config(&config)?;

        linfo!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "config_loaded",
            &format!("配置加载完成: {}", path.display()),
            overrides = overrides.len(),
        );

        Ok(Self {
            config,
            source: path.to_path_buf(),
        })
    }

    /// 当前配置
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 配置文件路径
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(LedgerError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| {
            LedgerError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}", path.display()),
                e,
            )
        })
    }

    /// 收集环境变量覆盖，`LEDGER_LOGS_EXPORT_MAX_ROWS` -> `logs.export.max.rows`
    fn build_env_overrides() -> HashMap<String, String> {
        env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|config_key| (config_key.to_lowercase().replace('_', "."), value))
            })
            .collect()
    }

    /// 将覆盖项写入配置对象
    pub fn apply_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            ldebug!(
                "system",
                LogStage::Configuration,
                LogComponent::Config,
                "apply_env_override",
                &format!(
                    "应用环境变量覆盖: {path} = {}",
                    if path.contains("secret") { "***" } else { value }
                )
            );
            Self::apply_override(config, path, value)?;
        }
        Ok(())
    }

    fn apply_override(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "bind", "address"] | ["server", "host"] => {
                config.server.bind_address = value.to_string();
            }
            ["server", "port"] => config.server.port = parse_value(path, value)?,
            ["server", "api", "prefix"] => config.server.api_prefix = value.to_string(),
            ["database", "url"] => config.database.url = value.to_string(),
            ["database", "max", "connections"] => {
                config.database.max_connections = parse_value(path, value)?;
            }
            ["auth", "jwt", "secret"] => config.auth.jwt_secret = value.to_string(),
            ["auth", "jwt", "expires", "in"] => {
                config.auth.jwt_expires_in = parse_value(path, value)?;
            }
            ["logs", "quota", "per", "unit"] => {
                config.logs.quota_per_unit = parse_value(path, value)?;
            }
            ["logs", "currency", "symbol"] => config.logs.currency_symbol = value.to_string(),
            ["logs", "export", "max", "rows"] => {
                config.logs.export_max_rows = parse_value(path, value)?;
            }
            ["logs", "delete", "batch", "size"] => {
                config.logs.delete_batch_size = parse_value(path, value)?;
            }
            ["logs", "search", "limit"] => config.logs.search_limit = parse_value(path, value)?,
            ["logs", "rate", "window", "secs"] => {
                config.logs.rate_window_secs = parse_value(path, value)?;
            }
            ["logs", "default", "page", "size"] => {
                config.logs.default_page_size = parse_value(path, value)?;
            }
            ["logs", "max", "page", "size"] => {
                config.logs.max_page_size = parse_value(path, value)?;
            }
            _ => {
                ldebug!(
                    "system",
                    LogStage::Configuration,
                    LogComponent::Config,
                    "unknown_env_override",
                    &format!("忽略未知的配置覆盖项: {path}")
                );
            }
        }
        Ok(())
    }
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| {
        LedgerError::config_with_source(format!("无效的配置覆盖 {path}: {value}"), e)
    })
}
