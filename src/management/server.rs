//! # 管理服务器
//!
//! Axum HTTP服务器，提供日志查询、统计、导出与清理 API

use super::middleware::{request_id_middleware, timezone_middleware};
use crate::auth::JwtManager;
use crate::config::{AppConfig, LogsConfig, ServerConfig};
use crate::error::{LedgerError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::usage::LogStore;
use crate::{linfo, lwarn};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 管理服务器应用状态
#[derive(Clone)]
pub struct ManagementState {
    store: Arc<dyn LogStore>,
    config: Arc<AppConfig>,
    jwt: Arc<JwtManager>,
}

impl ManagementState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn LogStore>) -> Self {
        let jwt = Arc::new(JwtManager::new(Arc::new(config.auth.clone())));
        Self { store, config, jwt }
    }

    #[must_use]
    pub fn log_store(&self) -> Arc<dyn LogStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn logs_config(&self) -> &LogsConfig {
        &self.config.logs
    }

    #[must_use]
    pub fn jwt_manager(&self) -> &JwtManager {
        &self.jwt
    }
}

/// 管理服务器
pub struct ManagementServer {
    state: ManagementState,
    router: Router,
}

impl ManagementServer {
    #[must_use]
    pub fn new(state: ManagementState) -> Self {
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// 启动服务器，收到 Ctrl+C 后优雅退出
    pub async fn serve(self) -> Result<()> {
        let addr = self.bind_address()?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            &format!("Starting management server on {addr}")
        );

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            LedgerError::server_start_with_source(format!("Failed to bind {addr}"), e)
        })?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| LedgerError::server_start_with_source("Management server error", e))?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stopped",
            "Management server stopped"
        );
        Ok(())
    }

    /// 获取绑定地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let server = &self.state.config().server;
        let ip = server.bind_address.parse::<std::net::IpAddr>().map_err(|e| {
            crate::error!(
                Config,
                "Invalid management bind address '{}': {e}",
                server.bind_address
            )
        })?;
        Ok(SocketAddr::new(ip, server.port))
    }
}

/// 创建完整路由器（API 嵌套在 `api_prefix` 下）
pub fn build_router(state: ManagementState) -> Router {
    let server = state.config().server.clone();
    let api_routes = super::routes::create_routes(state);

    let mut app = Router::new()
        .nest(&server.api_prefix, api_routes)
        .route("/ping", get(crate::management::handlers::system::ping));

    let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());
    if server.enable_cors {
        app = app.layer(service_builder.layer(cors_layer(&server)));
    } else {
        app = app.layer(service_builder);
    }

    app.layer(axum::middleware::from_fn(timezone_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::HeaderName::from_static("x-timezone"),
        ])
        .expose_headers([header::CONTENT_DISPOSITION]);

    if server.cors_origins.iter().any(|origin| origin == "*") {
        return cors_layer.allow_origin(Any);
    }

    let origins = server
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>();

    match origins {
        Ok(origins) => cors_layer.allow_origin(origins),
        Err(e) => {
            lwarn!(
                "system",
                LogStage::Startup,
                LogComponent::ServerSetup,
                "cors_config_fail",
                &format!("Invalid CORS origin configuration: {e}, falling back to allow any")
            );
            cors_layer.allow_origin(Any)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lwarn!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "signal_listen_fail",
            &format!("Failed to listen for shutdown signal: {e}")
        );
    }
}
