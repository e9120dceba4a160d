//! # 使用日志实体定义
//!
//! 每一行记录一次已计费的操作（消费、充值、管理调整等），写入后不再修改。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 使用日志实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// 创建时间（Unix 秒）
    pub created_at: i64,
    /// 日志类别代码，见 `LogType`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub log_type: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub username: String,
    pub token_name: String,
    pub model_name: String,
    /// 消耗额度（平台内部计量单位）
    pub quota: i64,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    /// 处理耗时（秒）
    pub use_time: i32,
    pub is_stream: bool,
    #[serde(rename = "channel")]
    pub channel_id: i32,
    pub token_id: i32,
    pub group: String,
    /// 关联键：同一次逻辑调用（含重试）产生的多行共享此值
    pub request_key: String,
    /// 半结构化元数据（JSON 文本，可为空）
    #[sea_orm(column_type = "Text")]
    pub other: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
