//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 管理服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: super::DatabaseConfig,
    /// 认证配置
    #[serde(default)]
    pub auth: crate::auth::AuthConfig,
    /// 使用日志查询与导出配置
    #[serde(default)]
    pub logs: LogsConfig,
}

/// 管理服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// API 路由前缀
    pub api_prefix: String,
    /// 是否启用 CORS
    pub enable_cors: bool,
    /// 允许的跨域来源，包含 `*` 时放开全部
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 9090,
            api_prefix: "/api".to_string(),
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// 日志查询、统计、导出与清理的策略参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// 每个货币单位对应的额度
    pub quota_per_unit: f64,
    /// 导出花费列的货币符号
    pub currency_symbol: String,
    /// 单次导出的最大行数
    pub export_max_rows: u64,
    /// 清理时每批删除的行数
    pub delete_batch_size: u64,
    /// 搜索结果上限
    pub search_limit: u64,
    /// RPM/TPM 统计窗口（秒）
    pub rate_window_secs: i64,
    /// 默认分页大小
    pub default_page_size: u64,
    /// 最大分页大小
    pub max_page_size: u64,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            quota_per_unit: 500_000.0,
            currency_symbol: "¥".to_string(),
            export_max_rows: 100_000,
            delete_batch_size: 100,
            search_limit: 100,
            rate_window_secs: 60,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
