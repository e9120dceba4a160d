//! # 日志配置模块
//!
//! 初始化 tracing 订阅器，并提供带统一字段的结构化日志宏。
//! 每条日志都携带 `request_id`、`stage`、`component`、`operation` 四个字段，
//! 便于按请求或按组件过滤。

use crate::error::{ErrorCategory, LedgerError};
use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志所处的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    Startup,
    Shutdown,
    Configuration,
    Authentication,
    Db,
    Internal,
    Export,
}

impl LogStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::Db => "db",
            Self::Internal => "internal",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    Main,
    Config,
    Database,
    ServerSetup,
    Auth,
    Query,
    Statistics,
    Export,
    Retention,
}

impl LogComponent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::Database => "database",
            Self::ServerSetup => "server_setup",
            Self::Auth => "auth",
            Self::Query => "query",
            Self::Statistics => "statistics",
            Self::Export => "export",
            Self::Retention => "retention",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ledger_log {
    ($level:ident, $request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(,)?) => {
        ::tracing::$level!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            "{}",
            $message
        )
    };
    ($level:ident, $request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr, $($fields:tt)+) => {
        ::tracing::$level!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($fields)+
            "{}",
            $message
        )
    };
}

/// info 级别结构化日志
#[macro_export]
macro_rules! linfo {
    ($($args:tt)+) => {
        $crate::__ledger_log!(info, $($args)+)
    };
}

/// warn 级别结构化日志
#[macro_export]
macro_rules! lwarn {
    ($($args:tt)+) => {
        $crate::__ledger_log!(warn, $($args)+)
    };
}

/// error 级别结构化日志
#[macro_export]
macro_rules! lerror {
    ($($args:tt)+) => {
        $crate::__ledger_log!(error, $($args)+)
    };
}

/// debug 级别结构化日志
#[macro_export]
macro_rules! ldebug {
    ($($args:tt)+) => {
        $crate::__ledger_log!(debug, $($args)+)
    };
}

/// 记录管理接口失败，客户端错误降为 warn
pub fn log_management_error(
    request_id: &str,
    stage: LogStage,
    component: LogComponent,
    operation: &str,
    message: &str,
    err: &LedgerError,
) {
    let (status, code) = err.to_http_response_parts();
    if err.category() == ErrorCategory::Client {
        crate::lwarn!(
            request_id,
            stage,
            component,
            operation,
            message,
            status = status.as_u16(),
            code = code,
            error = %err,
        );
    } else {
        crate::lerror!(
            request_id,
            stage,
            component,
            operation,
            message,
            status = status.as_u16(),
            code = code,
            error = ?err,
        );
    }
}

/// 初始化优化的日志系统
pub fn init_optimized_logging(log_level: Option<&String>) {
    let level = log_level.map_or("info", String::as_str);

    // 默认关闭逐条 SQL 日志
    let default_filter = format!("{level},usage_ledger=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn");

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();

    if env::var("RUST_LOG").is_ok_and(|v| {
        v.contains("sqlx::query=info") || v.contains("sqlx::query=debug")
    }) {
        tracing::info!("SQLx database query logging enabled");
    } else {
        tracing::info!("SQLx database query logging disabled");
    }
}
