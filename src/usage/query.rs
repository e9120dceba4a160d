//! # 日志查询服务

use super::filter::LogFilter;
use super::store::LogStore;
use super::types::{LogEntry, LogPage, LogScope, PageRequest};
use crate::ensure;
use crate::error::Result;
use std::sync::Arc;

/// 请求关联键可能带有的令牌前缀
const KEY_PREFIX: &str = "sk-";

/// 日志查询服务
#[derive(Clone)]
pub struct LogQueryService {
    store: Arc<dyn LogStore>,
    search_limit: u64,
}

impl LogQueryService {
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>, search_limit: u64) -> Self {
        Self {
            store,
            search_limit,
        }
    }

    /// 查询所有用户的日志
    pub async fn list_all(&self, filter: &LogFilter, page: PageRequest) -> Result<LogPage> {
        ensure!(page.limit > 0, Validation, "limit must be greater than 0");
        filter.validate()?;
        self.store.list(filter, page).await
    }

    /// 查询单个用户的日志，过滤条件中的用户名被忽略
    pub async fn list_for_user(
        &self,
        user_id: i32,
        filter: &LogFilter,
        page: PageRequest,
    ) -> Result<LogPage> {
        let scoped = filter.clone().scoped_to_user(user_id);
        self.list_all(&scoped, page).await
    }

    /// 在所有用户的日志中搜索
    pub async fn search_all(&self, keyword: &str) -> Result<Vec<LogEntry>> {
        self.search(LogScope::All, keyword).await
    }

    /// 在单个用户的日志中搜索
    pub async fn search_for_user(&self, user_id: i32, keyword: &str) -> Result<Vec<LogEntry>> {
        self.search(LogScope::User(user_id), keyword).await
    }

    async fn search(&self, scope: LogScope, keyword: &str) -> Result<Vec<LogEntry>> {
        self.store
            .search(scope, keyword.trim(), self.search_limit)
            .await
    }

    /// 按请求关联键查找，空键直接返回空结果
    pub async fn get_by_key(&self, key: &str) -> Result<Vec<LogEntry>> {
        let key = key.trim();
        let key = key.strip_prefix(KEY_PREFIX).unwrap_or(key);
        if key.is_empty() {
            return Ok(Vec::new());
        }
        self.store.find_by_key(key).await
    }
}
