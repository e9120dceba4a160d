//! # 日志管理处理器
//!
//! 处理 HTTP 请求，委托具体业务给 `LogsService`。

use crate::{
    error::LedgerError,
    linfo,
    logging::{LogComponent, LogStage, log_management_error},
    management::{
        middleware::{RequestId, auth::AuthContext},
        response,
        server::ManagementState,
        services::logs::{
            LogsByKeyQuery, LogsDeleteQuery, LogsListQuery, LogsSearchQuery, LogsService,
        },
    },
    types::TimezoneContext,
    usage::{LogFilterQuery, LogScope},
};
use axum::{
    body::Body,
    extract::{Extension, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

fn failure(
    request_id: &RequestId,
    component: LogComponent,
    operation: &str,
    message: &str,
    err: LedgerError,
) -> Response {
    log_management_error(
        request_id,
        LogStage::Internal,
        component,
        operation,
        message,
        &err,
    );
    response::app_error(err)
}

/// 获取全部日志
pub async fn list_all_logs(
    State(state): State<ManagementState>,
    Query(query): Query<LogsListQuery>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match LogsService::new(&state).list(LogScope::All, query).await {
        Ok(result) => response::paginated(result.items, result.pagination.into()),
        Err(err) => failure(
            &request_id,
            LogComponent::Query,
            "list_all_logs_fail",
            "获取日志列表失败",
            err,
        ),
    }
}

/// 获取当前用户日志
pub async fn list_self_logs(
    State(state): State<ManagementState>,
    Query(query): Query<LogsListQuery>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_context): Extension<Arc<AuthContext>>,
) -> Response {
    let scope = LogScope::User(auth_context.user_id);
    match LogsService::new(&state).list(scope, query).await {
        Ok(result) => response::paginated(result.items, result.pagination.into()),
        Err(err) => failure(
            &request_id,
            LogComponent::Query,
            "list_self_logs_fail",
            "获取个人日志列表失败",
            err,
        ),
    }
}

/// 全部日志统计
pub async fn get_logs_stat(
    State(state): State<ManagementState>,
    Query(query): Query<LogFilterQuery>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match LogsService::new(&state).stats(LogScope::All, query).await {
        Ok(stats) => response::success(stats),
        Err(err) => failure(
            &request_id,
            LogComponent::Statistics,
            "get_logs_stat_fail",
            "获取日志统计失败",
            err,
        ),
    }
}

/// 当前用户日志统计
pub async fn get_self_logs_stat(
    State(state): State<ManagementState>,
    Query(query): Query<LogFilterQuery>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_context): Extension<Arc<AuthContext>>,
) -> Response {
    let scope = LogScope::User(auth_context.user_id);
    match LogsService::new(&state).stats(scope, query).await {
        Ok(stats) => response::success(stats),
        Err(err) => failure(
            &request_id,
            LogComponent::Statistics,
            "get_self_logs_stat_fail",
            "获取个人日志统计失败",
            err,
        ),
    }
}

pub async fn search_all_logs(
    State(state): State<ManagementState>,
    Query(query): Query<LogsSearchQuery>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match LogsService::new(&state).search(LogScope::All, &query).await {
        Ok(items) => response::success(items),
        Err(err) => failure(
            &request_id,
            LogComponent::Query,
            "search_all_logs_fail",
            "搜索日志失败",
            err,
        ),
    }
}

pub async fn search_self_logs(
    State(state): State<ManagementState>,
    Query(query): Query<LogsSearchQuery>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_context): Extension<Arc<AuthContext>>,
) -> Response {
    let scope = LogScope::User(auth_context.user_id);
    match LogsService::new(&state).search(scope, &query).await {
        Ok(items) => response::success(items),
        Err(err) => failure(
            &request_id,
            LogComponent::Query,
            "search_self_logs_fail",
            "搜索个人日志失败",
            err,
        ),
    }
}

/// 按关联键获取同一次调用的全部日志
pub async fn get_logs_by_key(
    State(state): State<ManagementState>,
    Query(query): Query<LogsByKeyQuery>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match LogsService::new(&state).by_key(&query).await {
        Ok(items) => response::success(items),
        Err(err) => failure(
            &request_id,
            LogComponent::Query,
            "get_logs_by_key_fail",
            "按关联键获取日志失败",
            err,
        ),
    }
}

/// 删除指定时间之前的历史日志
pub async fn delete_history_logs(
    State(state): State<ManagementState>,
    Query(query): Query<LogsDeleteQuery>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_context): Extension<Arc<AuthContext>>,
) -> Response {
    match LogsService::new(&state).delete_before(&query).await {
        Ok(result) => {
            linfo!(
                request_id,
                LogStage::Internal,
                LogComponent::Retention,
                "delete_history_logs",
                "管理员删除历史日志",
                operator = %auth_context.username,
                operator_id = auth_context.user_id,
                deleted = result.deleted,
            );
            response::success(result)
        }
        Err(err) => failure(
            &request_id,
            LogComponent::Retention,
            "delete_history_logs_fail",
            "删除历史日志失败",
            err,
        ),
    }
}

/// 导出日志为 CSV
pub async fn export_logs(
    State(state): State<ManagementState>,
    Query(query): Query<LogFilterQuery>,
    Extension(request_id): Extension<RequestId>,
    Extension(timezone_context): Extension<Arc<TimezoneContext>>,
    Extension(auth_context): Extension<Arc<AuthContext>>,
) -> Response {
    let artifact = match LogsService::new(&state)
        .export(query, timezone_context.timezone)
        .await
    {
        Ok(artifact) => artifact,
        Err(err) => {
            return failure(
                &request_id,
                LogComponent::Export,
                "export_logs_fail",
                "导出日志失败",
                err,
            );
        }
    };

    linfo!(
        request_id,
        LogStage::Export,
        LogComponent::Export,
        "export_logs",
        "管理员导出日志",
        operator = %auth_context.username,
        operator_id = auth_context.user_id,
        rows = artifact.row_count,
    );

    let disposition = format!(
        "attachment; filename=\"{name}\"; filename*=UTF-8''{name}",
        name = artifact.filename
    );
    let mut response = Body::from_stream(artifact.into_stream()).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
