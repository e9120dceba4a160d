//! # 测试数据 Fixtures

use entity::logs;
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

/// 日志测试数据构建器
#[derive(Debug, Clone)]
pub struct LogFixture {
    pub user_id: i32,
    pub created_at: i64,
    pub log_type: i32,
    pub content: String,
    pub username: String,
    pub token_name: String,
    pub model_name: String,
    pub quota: i64,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub use_time: i32,
    pub is_stream: bool,
    pub channel_id: i32,
    pub group: String,
    pub request_key: String,
    pub other: String,
}

impl Default for LogFixture {
    fn default() -> Self {
        Self {
            user_id: 1,
            created_at: 1_700_000_000,
            log_type: 2,
            content: String::new(),
            username: "alice".to_string(),
            token_name: "default".to_string(),
            model_name: "gpt-4o".to_string(),
            quota: 1000,
            prompt_tokens: 10,
            completion_tokens: 20,
            use_time: 1,
            is_stream: false,
            channel_id: 1,
            group: "default".to_string(),
            request_key: String::new(),
            other: String::new(),
        }
    }
}

impl LogFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: i32, username: &str) -> Self {
        self.user_id = user_id;
        self.username = username.to_string();
        self
    }

    pub const fn at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub const fn log_type(mut self, code: i32) -> Self {
        self.log_type = code;
        self
    }

    pub const fn quota(mut self, quota: i64) -> Self {
        self.quota = quota;
        self
    }

    pub const fn tokens(mut self, prompt: i32, completion: i32) -> Self {
        self.prompt_tokens = prompt;
        self.completion_tokens = completion;
        self
    }

    pub fn model(mut self, model_name: &str) -> Self {
        self.model_name = model_name.to_string();
        self
    }

    pub fn token_name(mut self, token_name: &str) -> Self {
        self.token_name = token_name.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn other(mut self, other: &str) -> Self {
        self.other = other.to_string();
        self
    }

    pub fn request_key(mut self, key: &str) -> Self {
        self.request_key = key.to_string();
        self
    }

    pub const fn stream(mut self, use_time: i32, is_stream: bool) -> Self {
        self.use_time = use_time;
        self.is_stream = is_stream;
        self
    }

    pub const fn channel(mut self, channel_id: i32) -> Self {
        self.channel_id = channel_id;
        self
    }

    /// 构造内存中的模型，不落库
    pub fn build(self, id: i32) -> logs::Model {
        logs::Model {
            id,
            user_id: self.user_id,
            created_at: self.created_at,
            log_type: self.log_type,
            content: self.content,
            username: self.username,
            token_name: self.token_name,
            model_name: self.model_name,
            quota: self.quota,
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
            use_time: self.use_time,
            is_stream: self.is_stream,
            channel_id: self.channel_id,
            token_id: 0,
            group: self.group,
            request_key: self.request_key,
            other: self.other,
        }
    }

    /// 写入数据库
    pub async fn insert(self, db: &DatabaseConnection) -> logs::Model {
        logs::ActiveModel {
            id: NotSet,
            user_id: Set(self.user_id),
            created_at: Set(self.created_at),
            log_type: Set(self.log_type),
            content: Set(self.content),
            username: Set(self.username),
            token_name: Set(self.token_name),
            model_name: Set(self.model_name),
            quota: Set(self.quota),
            prompt_tokens: Set(self.prompt_tokens),
            completion_tokens: Set(self.completion_tokens),
            use_time: Set(self.use_time),
            is_stream: Set(self.is_stream),
            channel_id: Set(self.channel_id),
            token_id: Set(0),
            group: Set(self.group),
            request_key: Set(self.request_key),
            other: Set(self.other),
        }
        .insert(db)
        .await
        .expect("insert log fixture")
    }
}
