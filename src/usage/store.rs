//! # 日志存储
//!
//! `LogStore` 是查询、统计、导出和清理所依赖的存储契约；
//! `SeaOrmLogStore` 基于 sea-orm 实现，所有入口共用 [`apply_filter`]
//! 把过滤条件翻译为 SQL 条件。

use super::filter::LogFilter;
use super::types::{LogEntry, LogPage, LogScope, PageRequest, WindowUsage};
use crate::error::{LedgerError, Result};
use crate::{
    ldebug,
    logging::{LogComponent, LogStage},
};
use async_trait::async_trait;
use entity::logs::{self, Entity as Logs};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use std::sync::Arc;

/// 日志存储契约
#[async_trait]
pub trait LogStore: Send + Sync {
    /// 按过滤条件分页查询，附带匹配总数
    async fn list(&self, filter: &LogFilter, page: PageRequest) -> Result<LogPage>;

    /// 关键字搜索，最多返回 `limit` 条
    async fn search(&self, scope: LogScope, keyword: &str, limit: u64) -> Result<Vec<LogEntry>>;

    /// 按请求关联键精确查找
    async fn find_by_key(&self, key: &str) -> Result<Vec<LogEntry>>;

    /// 匹配记录的额度总和
    async fn sum_quota(&self, filter: &LogFilter) -> Result<i64>;

    /// 匹配记录的请求数和 token 数
    async fn window_usage(&self, filter: &LogFilter) -> Result<WindowUsage>;

    /// 分批删除早于 `cutoff` 的记录，返回删除总数
    async fn delete_before(&self, cutoff: i64, batch_size: u64) -> Result<u64>;
}

/// 基于 sea-orm 的日志存储
#[derive(Clone)]
pub struct SeaOrmLogStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmLogStore {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn db_error(message: &str) -> impl FnOnce(DbErr) -> LedgerError + '_ {
    move |err| LedgerError::database_with_source(message, err)
}

/// 把过滤条件应用到查询上
#[must_use]
pub fn apply_filter(mut select: Select<Logs>, filter: &LogFilter) -> Select<Logs> {
    if let Some(user_id) = filter.user_id {
        select = select.filter(logs::Column::UserId.eq(user_id));
    }
    if let Some(log_type) = filter.log_type {
        select = select.filter(logs::Column::LogType.eq(log_type.code()));
    }
    if let Some(start) = filter.start_timestamp {
        select = select.filter(logs::Column::CreatedAt.gte(start));
    }
    if let Some(end) = filter.end_timestamp {
        select = select.filter(logs::Column::CreatedAt.lte(end));
    }
    if let Some(username) = &filter.username {
        select = select.filter(logs::Column::Username.eq(username.as_str()));
    }
    if let Some(token_name) = &filter.token_name {
        select = select.filter(logs::Column::TokenName.eq(token_name.as_str()));
    }
    if let Some(model_name) = &filter.model_name {
        select = select.filter(logs::Column::ModelName.eq(model_name.as_str()));
    }
    if let Some(channel) = filter.channel {
        select = select.filter(logs::Column::ChannelId.eq(channel));
    }
    if let Some(group) = &filter.group {
        select = select.filter(logs::Column::Group.eq(group.as_str()));
    }
    select
}

/// LIKE 转义字符，关键字中的 `%` 和 `_` 按字面匹配
const LIKE_ESCAPE: char = '!';

fn contains_pattern(keyword: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// 关键字匹配条件：数字关键字额外匹配类别编码
fn keyword_condition(keyword: &str) -> Condition {
    let pattern = contains_pattern(keyword);
    let mut condition = Condition::any()
        .add(logs::Column::Content.like(pattern.clone()))
        .add(logs::Column::ModelName.like(pattern.clone()))
        .add(logs::Column::TokenName.like(pattern.clone()))
        .add(logs::Column::Username.like(pattern));
    if let Ok(code) = keyword.parse::<i32>() {
        condition = condition.add(logs::Column::LogType.eq(code));
    }
    condition
}

fn newest_first(select: Select<Logs>) -> Select<Logs> {
    select
        .order_by_desc(logs::Column::CreatedAt)
        .order_by_desc(logs::Column::Id)
}

#[async_trait]
impl LogStore for SeaOrmLogStore {
    async fn list(&self, filter: &LogFilter, page: PageRequest) -> Result<LogPage> {
        let select = apply_filter(Logs::find(), filter);

        let total = select
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(db_error("统计日志数量失败"))?;

        let items = newest_first(select)
            .offset(page.offset)
            .limit(page.limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_error("查询日志列表失败"))?;

        Ok(LogPage { items, total })
    }

    async fn search(&self, scope: LogScope, keyword: &str, limit: u64) -> Result<Vec<LogEntry>> {
        let mut select = Logs::find();
        if let Some(user_id) = scope.user_id() {
            select = select.filter(logs::Column::UserId.eq(user_id));
        }
        if !keyword.is_empty() {
            select = select.filter(keyword_condition(keyword));
        }

        newest_first(select)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_error("搜索日志失败"))
    }

    async fn find_by_key(&self, key: &str) -> Result<Vec<LogEntry>> {
        newest_first(Logs::find().filter(logs::Column::RequestKey.eq(key)))
            .all(self.db.as_ref())
            .await
            .map_err(db_error("按请求键查询日志失败"))
    }

    async fn sum_quota(&self, filter: &LogFilter) -> Result<i64> {
        let quota: Option<Option<i64>> = apply_filter(Logs::find(), filter)
            .select_only()
            .column_as(logs::Column::Quota.sum(), "quota")
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(db_error("汇总日志额度失败"))?;

        Ok(quota.flatten().unwrap_or(0))
    }

    async fn window_usage(&self, filter: &LogFilter) -> Result<WindowUsage> {
        let row: Option<(i64, Option<i64>, Option<i64>)> = apply_filter(Logs::find(), filter)
            .select_only()
            .column_as(logs::Column::Id.count(), "requests")
            .column_as(logs::Column::PromptTokens.sum(), "prompt_tokens")
            .column_as(logs::Column::CompletionTokens.sum(), "completion_tokens")
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(db_error("统计窗口用量失败"))?;

        Ok(row.map_or_else(WindowUsage::default, |(requests, prompt, completion)| {
            WindowUsage {
                requests,
                tokens: prompt.unwrap_or(0) + completion.unwrap_or(0),
            }
        }))
    }

    async fn delete_before(&self, cutoff: i64, batch_size: u64) -> Result<u64> {
        let batch_len = usize::try_from(batch_size).unwrap_or(usize::MAX);
        let mut deleted = 0_u64;

        loop {
            let ids: Vec<i32> = Logs::find()
                .select_only()
                .column(logs::Column::Id)
                .filter(logs::Column::CreatedAt.lt(cutoff))
                .order_by_asc(logs::Column::Id)
                .limit(batch_size)
                .into_tuple()
                .all(self.db.as_ref())
                .await
                .map_err(db_error("查询待清理日志失败"))?;

            if ids.is_empty() {
                break;
            }
            let fetched = ids.len();

            let result = Logs::delete_many()
                .filter(logs::Column::Id.is_in(ids))
                .exec(self.db.as_ref())
                .await
                .map_err(db_error("删除历史日志失败"))?;
            deleted += result.rows_affected;

            ldebug!(
                "system",
                LogStage::Db,
                LogComponent::Retention,
                "delete_batch",
                &format!("已删除一批历史日志: {}", result.rows_affected),
                cutoff = cutoff,
                total = deleted,
            );

            if fetched < batch_len {
                break;
            }
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::types::LogType;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(filter: &LogFilter) -> String {
        apply_filter(Logs::find(), filter)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_empty_filter_adds_no_conditions() {
        assert!(!sql(&LogFilter::default()).contains("WHERE"));
    }

    #[test]
    fn test_filter_dimensions_become_conditions() {
        let statement = sql(&LogFilter {
            log_type: Some(LogType::Consume),
            start_timestamp: Some(100),
            end_timestamp: Some(200),
            model_name: Some("gpt-4o".to_string()),
            channel: Some(3),
            user_id: Some(9),
            ..LogFilter::default()
        });

        assert!(statement.contains(r#""logs"."type" = 2"#));
        assert!(statement.contains(r#""logs"."created_at" >= 100"#));
        assert!(statement.contains(r#""logs"."created_at" <= 200"#));
        assert!(statement.contains(r#""logs"."model_name" = 'gpt-4o'"#));
        assert!(statement.contains(r#""logs"."channel_id" = 3"#));
        assert!(statement.contains(r#""logs"."user_id" = 9"#));
        assert!(!statement.contains(r#""logs"."username" ="#));
    }

    #[test]
    fn test_numeric_keyword_matches_type() {
        let statement = Logs::find()
            .filter(keyword_condition("2"))
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(statement.contains(r#""logs"."type" = 2"#));
        assert!(statement.contains("LIKE '%2%'"));

        let statement = Logs::find()
            .filter(keyword_condition("gpt"))
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(!statement.contains(r#""logs"."type" ="#));
    }

    #[test]
    fn test_keyword_wildcards_are_literal() {
        let statement = Logs::find()
            .filter(keyword_condition("50%_off!"))
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(statement.contains("LIKE '%50!%!_off!!%'"));
        assert!(statement.contains("ESCAPE"));
    }
}
