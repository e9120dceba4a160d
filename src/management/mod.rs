//! # 管理API模块
//!
//! 提供使用日志的查询、统计、导出与清理接口

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;

pub use routes::create_routes;
pub use server::{ManagementServer, ManagementState};
