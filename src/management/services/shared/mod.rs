//! # 服务层共享工具

pub mod pagination;

pub use pagination::{PageQuery, PaginationInfo, PaginationParams, build_page};
