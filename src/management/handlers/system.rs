//! # 系统信息处理器

use crate::management::response;
use serde::Serialize;

#[derive(Serialize)]
struct PingInfo {
    service: &'static str,
    version: &'static str,
}

/// 存活检查
pub async fn ping() -> axum::response::Response {
    response::success(PingInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
