//! # 认证中间件
//!
//! 从请求头中提取JWT，验证并将其解析的用户信息注入到请求扩展中。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::AuthUtils;
use crate::error::LedgerError;
use crate::management::{response, server::ManagementState};
use crate::{
    ldebug,
    logging::{LogComponent, LogStage},
};

/// 包含认证用户信息的上下文
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
}

/// Axum认证中间件
pub async fn auth(
    State(state): State<ManagementState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = AuthUtils::extract_authorization_header(request.headers())
        .and_then(AuthUtils::extract_bearer_token)
    else {
        return response::app_error(LedgerError::auth("缺少认证令牌"));
    };

    let claims = match state.jwt_manager().validate_token(token) {
        Ok(claims) => claims,
        Err(err) => {
            ldebug!(
                "system",
                LogStage::Authentication,
                LogComponent::Auth,
                "token_rejected",
                &format!("认证令牌校验失败: {err}")
            );
            return response::app_error(err);
        }
    };

    let Ok(user_id) = claims.user_id() else {
        return response::app_error(LedgerError::auth("认证令牌中的用户ID无效"));
    };

    request.extensions_mut().insert(Arc::new(AuthContext {
        user_id,
        username: claims.username,
        is_admin: claims.is_admin,
    }));
    next.run(request).await
}

/// 仅允许管理员访问，需位于 [`auth`] 之后
pub async fn require_admin(request: Request, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<Arc<AuthContext>>()
        .is_some_and(|context| context.is_admin);

    if !is_admin {
        return response::app_error(LedgerError::permission("需要管理员权限"));
    }
    next.run(request).await
}
