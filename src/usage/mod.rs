//! # 使用日志
//!
//! 过滤、查询、统计、导出与清理。各服务都是持有 `Arc<dyn LogStore>`
//! 的无状态结构体，可在请求间随意克隆。

pub mod export;
pub mod filter;
pub mod metadata;
pub mod query;
pub mod retention;
pub mod stats;
pub mod store;
pub mod types;

pub use export::{ExportArtifact, ExportEngine, ExportSettings, RowFormatter};
pub use filter::{LogFilter, LogFilterQuery};
pub use metadata::LogMetadata;
pub use query::LogQueryService;
pub use retention::RetentionGateway;
pub use stats::StatsAggregator;
pub use store::{LogStore, SeaOrmLogStore};
pub use types::{LogEntry, LogPage, LogScope, LogType, PageRequest, StatsResult, WindowUsage};
