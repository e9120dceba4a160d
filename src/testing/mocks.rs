//! # 存储 Mock

use crate::error::{LedgerError, Result};
use crate::usage::{
    LogEntry, LogFilter, LogPage, LogScope, LogStore, PageRequest, WindowUsage,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 返回固定数据的存储，不解释过滤条件，只按分页截断
#[derive(Default)]
pub struct MockLogStore {
    rows: Vec<LogEntry>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockLogStore {
    pub fn with_rows(rows: Vec<LogEntry>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// 所有调用都返回数据库错误
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LedgerError::database("database is locked"));
        }
        Ok(())
    }

    fn take(&self, offset: u64, limit: u64) -> Vec<LogEntry> {
        self.rows
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LogStore for MockLogStore {
    async fn list(&self, _filter: &LogFilter, page: PageRequest) -> Result<LogPage> {
        self.enter()?;
        Ok(LogPage {
            items: self.take(page.offset, page.limit),
            total: self.rows.len() as u64,
        })
    }

    async fn search(&self, _scope: LogScope, _keyword: &str, limit: u64) -> Result<Vec<LogEntry>> {
        self.enter()?;
        Ok(self.take(0, limit))
    }

    async fn find_by_key(&self, key: &str) -> Result<Vec<LogEntry>> {
        self.enter()?;
        Ok(self
            .rows
            .iter()
            .filter(|row| row.request_key == key)
            .cloned()
            .collect())
    }

    async fn sum_quota(&self, _filter: &LogFilter) -> Result<i64> {
        self.enter()?;
        Ok(self.rows.iter().map(|row| row.quota).sum())
    }

    async fn window_usage(&self, _filter: &LogFilter) -> Result<WindowUsage> {
        self.enter()?;
        Ok(WindowUsage {
            requests: self.rows.len() as i64,
            tokens: self
                .rows
                .iter()
                .map(|row| i64::from(row.prompt_tokens) + i64::from(row.completion_tokens))
                .sum(),
        })
    }

    async fn delete_before(&self, cutoff: i64, _batch_size: u64) -> Result<u64> {
        self.enter()?;
        Ok(self.rows.iter().filter(|row| row.created_at < cutoff).count() as u64)
    }
}
