//! # 管理服务层
//!
//! 处理器只负责提取参数和组装响应，参数解析与领域服务的组合放在这里。

pub mod logs;
pub mod shared;

pub use logs::{LogsListResult, LogsService};
pub use shared::{PageQuery, PaginationInfo, PaginationParams, build_page};
