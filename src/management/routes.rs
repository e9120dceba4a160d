//! # 路由配置
//!
//! 定义所有API路由和路由组织

use crate::management::handlers::logs;
use crate::management::middleware::{auth, require_admin};
use crate::management::server::ManagementState;
use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;

/// 创建所有路由
pub fn create_routes(state: ManagementState) -> Router {
    Router::new()
        // 日志查询、统计、导出与清理
        .nest("/log", log_routes(state.clone()))
        .with_state(state)
}

/// 日志路由：管理员接口与自助接口共用认证，管理员接口额外校验权限
fn log_routes(state: ManagementState) -> Router<ManagementState> {
    let admin_routes = Router::new()
        .route(
            "/",
            get(logs::list_all_logs).delete(logs::delete_history_logs),
        )
        .route("/stat", get(logs::get_logs_stat))
        .route("/search", get(logs::search_all_logs))
        .route("/token", get(logs::get_logs_by_key))
        .route("/export", get(logs::export_logs))
        .route_layer(from_fn(require_admin));

    let self_routes = Router::new()
        .route("/self", get(logs::list_self_logs))
        .route("/self/stat", get(logs::get_self_logs_stat))
        .route("/self/search", get(logs::search_self_logs));

    admin_routes
        .merge(self_routes)
        .route_layer(from_fn_with_state(state, auth))
}
