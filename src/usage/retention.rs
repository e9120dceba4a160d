//! # 历史日志清理

use super::store::LogStore;
use crate::ensure;
use crate::error::{LedgerError, Result};
use crate::{
    linfo,
    logging::{LogComponent, LogStage},
};
use std::sync::Arc;

/// 历史日志清理入口
#[derive(Clone)]
pub struct RetentionGateway {
    store: Arc<dyn LogStore>,
}

impl RetentionGateway {
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// 删除早于 `cutoff` 的日志；`cutoff` 必须为正数
    pub async fn delete_before(&self, cutoff: i64, batch_size: u64) -> Result<u64> {
        if cutoff <= 0 {
            return Err(LedgerError::validation_field(
                "target timestamp is required",
                "target_timestamp",
            ));
        }
        ensure!(batch_size > 0, Validation, "batch size must be greater than 0");

        let deleted = self.store.delete_before(cutoff, batch_size).await?;
        linfo!(
            "system",
            LogStage::Db,
            LogComponent::Retention,
            "delete_history_logs",
            &format!("清理历史日志 {deleted} 条"),
            cutoff = cutoff,
        );
        Ok(deleted)
    }
}
