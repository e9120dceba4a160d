//! # 日志管理服务
//!
//! 解析查询参数并组合查询、统计、导出与清理服务，处理器只负责响应组装。

use crate::{
    error::Result,
    linfo,
    logging::{LogComponent, LogStage},
    management::server::ManagementState,
    usage::{
        ExportArtifact, ExportEngine, ExportSettings, LogEntry, LogFilterQuery, LogQueryService,
        LogScope, RetentionGateway, StatsAggregator, StatsResult, filter::lenient_i64,
    },
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::shared::{PageQuery, PaginationInfo, build_page};

/// 日志列表查询参数（过滤条件 + 分页）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsListQuery {
    #[serde(flatten)]
    pub filter: LogFilterQuery,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// 关键字搜索参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsSearchQuery {
    pub keyword: Option<String>,
}

/// 按关联键查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsByKeyQuery {
    pub key: Option<String>,
}

/// 历史日志清理参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsDeleteQuery {
    pub target_timestamp: Option<String>,
}

/// 日志列表结果
#[derive(Debug, Serialize)]
pub struct LogsListResult {
    pub items: Vec<LogEntry>,
    pub pagination: PaginationInfo,
}

/// 清理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogsDeleteResult {
    pub deleted: u64,
}

/// 日志服务
pub struct LogsService<'a> {
    state: &'a ManagementState,
}

impl<'a> LogsService<'a> {
    #[must_use]
    pub const fn new(state: &'a ManagementState) -> Self {
        Self { state }
    }

    fn query_service(&self) -> LogQueryService {
        LogQueryService::new(
            self.state.log_store(),
            self.state.logs_config().search_limit,
        )
    }

    /// 分页列表，自助范围会忽略调用方给出的用户名
    pub async fn list(&self, scope: LogScope, query: LogsListQuery) -> Result<LogsListResult> {
        let logs_config = self.state.logs_config();
        let params = query
            .page
            .to_params(logs_config.default_page_size, logs_config.max_page_size);
        let filter = query.filter.into_filter()?;

        let service = self.query_service();
        let page = match scope {
            LogScope::All => service.list_all(&filter, params.to_request()).await?,
            LogScope::User(user_id) => {
                service
                    .list_for_user(user_id, &filter, params.to_request())
                    .await?
            }
        };

        Ok(LogsListResult {
            pagination: build_page(page.total, params),
            items: page.items,
        })
    }

    pub async fn search(&self, scope: LogScope, query: &LogsSearchQuery) -> Result<Vec<LogEntry>> {
        let keyword = query.keyword.as_deref().unwrap_or_default();
        let service = self.query_service();
        match scope {
            LogScope::All => service.search_all(keyword).await,
            LogScope::User(user_id) => service.search_for_user(user_id, keyword).await,
        }
    }

    pub async fn by_key(&self, query: &LogsByKeyQuery) -> Result<Vec<LogEntry>> {
        self.query_service()
            .get_by_key(query.key.as_deref().unwrap_or_default())
            .await
    }

    pub async fn stats(&self, scope: LogScope, query: LogFilterQuery) -> Result<StatsResult> {
        let mut filter = query.into_filter()?;
        if let Some(user_id) = scope.user_id() {
            filter = filter.scoped_to_user(user_id);
        }

        StatsAggregator::new(
            self.state.log_store(),
            self.state.logs_config().rate_window_secs,
        )
        .sum(&filter)
        .await
    }

    /// 删除 `target_timestamp` 之前的日志，参数缺失或非正数时拒绝
    pub async fn delete_before(&self, query: &LogsDeleteQuery) -> Result<LogsDeleteResult> {
        let cutoff = lenient_i64(query.target_timestamp.as_deref());
        let deleted = RetentionGateway::new(self.state.log_store())
            .delete_before(cutoff, self.state.logs_config().delete_batch_size)
            .await?;
        Ok(LogsDeleteResult { deleted })
    }

    pub async fn export(&self, query: LogFilterQuery, timezone: Tz) -> Result<ExportArtifact> {
        let filter = query.into_filter()?;
        let engine = ExportEngine::new(
            self.query_service(),
            ExportSettings::from(self.state.logs_config()),
        );
        let artifact = engine.export(&filter, timezone).await?;

        linfo!(
            "system",
            LogStage::Export,
            LogComponent::Export,
            "export_started",
            "开始导出日志",
            filename = %artifact.filename,
            rows = artifact.row_count,
            timezone = %timezone,
        );
        Ok(artifact)
    }
}
