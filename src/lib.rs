//! # Usage Ledger Library
//!
//! 计费 API 平台的使用日志查询、统计、导出与清理服务核心库

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod management;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;
pub mod usage;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{LedgerError, Result};
